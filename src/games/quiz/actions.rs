//! Semantic action IDs for quiz arena click targets.

// ── Level points ───────────────────────────────────────────────
pub const ALLOC_HP: u16 = 10;
pub const ALLOC_ATK: u16 = 11;

// ── Answer card ────────────────────────────────────────────────
/// Submit the typed answer. While game over the same button respawns.
pub const SUBMIT: u16 = 20;
/// Clear the answer buffer.
pub const CLEAR_ANSWER: u16 = 21;
