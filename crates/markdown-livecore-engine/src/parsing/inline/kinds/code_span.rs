/// Code span delimiter.
///
/// A code span opens with a run of backticks and closes with a run of the
/// same length. Everything between is raw.
pub struct CodeSpan;

impl CodeSpan {
    pub const TICK: u8 = b'`';
}
