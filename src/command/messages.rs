//! Canned reply texts and command prefixes

/// Command prefixes recognized in chat
pub const HELP_COMMAND: &str = "!help";
pub const MIX_COMMAND: &str = "!mix";
pub const REPORT_COMMAND: &str = "!report";

/// Reply to `!help`
pub const HELP_MESSAGE: &str = "\
Team Mixer here! 🎲

You summoned my powers, let's see what I can do for you:

❓ Want a random MIX?
➡️ Type `!mix` with the player names separated by commas, spaces, hyphens... (any sloppy format works)

   **Examples:**
   • `!mix Ana, Bob, Cid, Dora` (commas)
   • `!mix Ana Bob Cid Dora` (spaces)
   • `!mix Ana - Bob - Cid` (hyphens)
   • `!mix @Ana @Bob @Cid` (mentions)
   • `!mix` (while in a voice channel, grabs everyone automatically! 🎤)

🚫 **ANTI-STACKING:** Use parentheses, square brackets or braces to mark players who play together too much!
   Grouped players get **SPLIT UP** across the teams to keep things fair.

   **Examples:**
   • `!mix (Ana, Bob) Cid Dora Eva` → Ana and Bob land on different teams
   • `!mix [Tryhard1, Tryhard2] Casual1 Casual2` → the tryhards are separated
   • `!mix {Friend1, Friend2, Friend3} Rest1 Rest2` → the clique gets spread out

   ⚖️ Result: balanced teams, with no crew steamrolling the lobby! 🎯

❓ Someone was toxic and you want to report them?
➡️ Talk to a moderator or use the `!report` command.

Good games!

- Team Mixer 🤖";

/// Reply to a `!report` that names someone
pub const REPORT_MESSAGE: &str = "\
🚨 **Player report** 🚨

👮 Thanks for sending the player over to moderation. We will review the case and take it from there. 🚔";

/// Nag for `!mix` or `!report` with nothing after it and no voice channel to
/// fall back on
pub const NEED_PLAYERS_MESSAGE: &str =
    "🚨 You need to list the players, separated by commas! It is not that hard, just read.";

/// Rejection for a roster with a single player
pub const TOO_FEW_PLAYERS_MESSAGE: &str =
    "🚨 One player is not a mix. Bring at least one more and try again!";
