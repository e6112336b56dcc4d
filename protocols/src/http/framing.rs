//! Line framing for the response head.
//!
//! Each incoming byte is classified and run through [`Framing::step`]. The
//! only state that matters is whether the previous byte was a line feed: a
//! line ends on LF followed by anything but SP/HT, while LF followed by SP/HT
//! is an obsolete folded continuation and stays on the same line.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteClass {
    /// SP or HT.
    Whitespace,
    Cr,
    Lf,
    /// 0x00-0x1F (minus HT, CR, LF) and DEL.
    Control,
    Text,
}

impl ByteClass {
    pub fn of(byte: u8) -> Self {
        match byte {
            b' ' | b'\t' => ByteClass::Whitespace,
            b'\r' => ByteClass::Cr,
            b'\n' => ByteClass::Lf,
            0..=31 | 127 => ByteClass::Control,
            _ => ByteClass::Text,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Framing {
    #[default]
    InLine,
    AfterLf,
}

/// What to do with the byte that caused a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteAction {
    Store(u8),
    Discard,
    /// A line feed on the current line; an empty line here ends the head.
    LineFeed,
    Reject,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// The line held before this byte is finished.
    pub completes_line: bool,
    pub action: ByteAction,
    pub next: Framing,
}

impl Framing {
    pub fn step(self, byte: u8) -> Transition {
        let class = ByteClass::of(byte);
        let completes_line = self == Framing::AfterLf
            && !matches!(class, ByteClass::Whitespace | ByteClass::Control);

        let (action, next) = match class {
            ByteClass::Control => (ByteAction::Reject, self),
            // Folded or embedded whitespace is kept as a single space.
            ByteClass::Whitespace => (ByteAction::Store(b' '), Framing::InLine),
            ByteClass::Cr => (ByteAction::Discard, Framing::InLine),
            ByteClass::Lf => (ByteAction::LineFeed, Framing::AfterLf),
            ByteClass::Text => (ByteAction::Store(byte), Framing::InLine),
        };

        Transition {
            completes_line,
            action,
            next,
        }
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
