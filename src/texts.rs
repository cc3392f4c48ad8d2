//! User-facing message texts. HTML parse mode throughout.

use crate::protocol::InfoTopic;

pub const GREETING: &str = "Namaskar! I'm the host bot for the party game.\n\n\
Press <b>Start game</b> to play 🙂\n\n\
How to play — /rules\nAbout the game — /about\n\
Printable question cards — /cards\nThank the author — /donate";

pub const PROMPT_FOR_PLAYERS: &str = "Enter the list of players, \
<b>one name per line</b>, then send the message.\n\nFor example:\n\n\
<i>Alice\nBob\nCarol</i>";

pub const EMPTY_ROSTER: &str = "The player list is empty. Enter at least one name.";

pub const POOL_EXHAUSTED: &str = "Congratulations, we're out of questions! 😊";

pub const NO_SESSION: &str = "Error: start the game over with /start";

pub const RULES: &str = "📜 <b>Rules</b>\n\n\
The host picks <b>New game</b>, enters the player names and presses \
<b>Ask a question</b>. One player receives the first question. After the \
answer, press <b>Next question</b> and read the question for the next \
player. Players can also take turns pressing the button themselves.\n\n\
<i><b>The one rule:</b> let the answering player speak without interruption \
or commentary. This is not a debate; give each player room to express \
themselves.</i>\n\nQuestions are handed out at random and never repeat \
within one game.";

pub const ABOUT: &str = "ℹ <b>About</b>\n\n\
A conversation game for getting to know each other: it builds trust and \
connection in a group by giving every player the same chance to speak. \
Useful for icebreakers, team sessions and game nights, one-on-one or in a \
circle.";

pub const CARDS: &str = "Oops, the printable question cards aren't drawn \
yet 🙂\n\nIf you'd like to help with the design, contact the developer.";

pub const DONATE: &str = "🙏 <b>Thanks</b>\n\n\
If the game brought you joy, you can thank the author — ask the bot's \
developer for the details.";

pub fn info_text(topic: InfoTopic) -> &'static str {
    match topic {
        InfoTopic::Rules => RULES,
        InfoTopic::About => ABOUT,
        InfoTopic::Cards => CARDS,
        InfoTopic::Donate => DONATE,
    }
}

pub fn roster_confirmed(players: &[String]) -> String {
    format!(
        "Let's go! Players: <i>{}</i>\n\nPress <b>Ask a question</b>.",
        players.join(", ")
    )
}

pub fn question_for(player: &str, question: &str) -> String {
    format!("Question for <i>{}</i>\n\n<b>{}</b>", player, question)
}

pub const REFRESH_STARTED: &str = "🔄 Updating the question list...";

pub fn refresh_ok(count: usize) -> String {
    format!("✅ Question list updated. Loaded {} questions.", count)
}

pub fn refresh_failed(reason: &str) -> String {
    format!("❌ Update failed: {}", reason)
}
