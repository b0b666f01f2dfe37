// regint.rs - Internal types
// Instruction set, byte-range classes and the compiled Program container.

use smallvec::SmallVec;

// === Bytecode Types ===
pub type InstAddr = usize;
pub type SlotNum = usize;
pub type EmptyCheckId = usize;

/// Inclusive byte range `lo..=hi` inside a character class.
pub type ByteRange = (u8, u8);

/// Range storage for a class; most classes fit inline (`[a-zA-Z0-9_]` is 4).
pub type ClassRanges = SmallVec<[ByteRange; 4]>;

// === Shorthand classes ===
pub const DIGIT_RANGES: &[ByteRange] = &[(b'0', b'9')];
pub const SPACE_RANGES: &[ByteRange] = &[(b'\t', b'\r'), (b' ', b' ')];
pub const WORD_RANGES: &[ByteRange] = &[(b'0', b'9'), (b'A', b'Z'), (b'_', b'_'), (b'a', b'z')];

/// Sort and coalesce overlapping or adjacent ranges in place.
pub fn normalize_ranges(ranges: &mut ClassRanges) {
    if ranges.len() < 2 {
        return;
    }
    ranges.sort_unstable();
    let mut out: ClassRanges = SmallVec::with_capacity(ranges.len());
    for &(lo, hi) in ranges.iter() {
        match out.last_mut() {
            Some(last) if (last.1 as u16) + 1 >= lo as u16 => {
                if hi > last.1 {
                    last.1 = hi;
                }
            }
            _ => out.push((lo, hi)),
        }
    }
    *ranges = out;
}

/// Complement of a normalized range set over the whole byte space.
pub fn invert_ranges(ranges: &[ByteRange]) -> ClassRanges {
    let mut out = ClassRanges::new();
    let mut next: u16 = 0;
    for &(lo, hi) in ranges {
        if (lo as u16) > next {
            out.push((next as u8, lo - 1));
        }
        next = hi as u16 + 1;
    }
    if next <= 0xff {
        out.push((next as u8, 0xff));
    }
    out
}

#[inline]
pub fn ranges_contain(ranges: &[ByteRange], c: u8) -> bool {
    ranges.iter().any(|&(lo, hi)| lo <= c && c <= hi)
}

// === Inst (Bytecode Instruction) ===
//
// Every instruction occupies exactly one slot of `Program::insts`; branch
// targets are absolute slot indices.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Inst {
    Char(u8),
    Any,
    Class { ranges: ClassRanges, negated: bool },
    Match,
    Jump(InstAddr),
    /// Try `.0` first, fall back to `.1` on failure.
    Split(InstAddr, InstAddr),
    Save(SlotNum),
    AnchorStart,
    AnchorEnd,
    /// Record the subject position on entry to a nullable loop body.
    EmptyCheckStart(EmptyCheckId),
    /// If the loop body consumed nothing, skip the following back-edge.
    EmptyCheckEnd(EmptyCheckId),
}

impl Inst {
    /// Whether this instruction can be matched against the byte `c`.
    /// Only meaningful for consuming instructions.
    #[inline]
    pub fn matches_byte(&self, c: u8) -> bool {
        match self {
            Inst::Char(x) => *x == c,
            Inst::Any => true,
            Inst::Class { ranges, negated } => ranges_contain(ranges, c) != *negated,
            _ => false,
        }
    }
}

// === Program ===
#[derive(Debug)]
pub struct Program {
    pub insts: Vec<Inst>,
    /// Number of capturing groups, excluding the implicit group 0.
    pub sub: usize,
    pub num_empty_check: usize,
    /// Byte every match must start with, when the program begins with a fixed `Char`.
    pub first_byte: Option<u8>,
    /// The program can only match at the subject window's begin.
    pub anchored_start: bool,
}

impl Program {
    /// Empty program with room for exactly `size` instructions.
    pub fn with_capacity(size: usize) -> Self {
        Program {
            insts: Vec::with_capacity(size),
            sub: 0,
            num_empty_check: 0,
            first_byte: None,
            anchored_start: false,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.insts.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.insts.is_empty()
    }

    /// Number of capture slots (`2 * (sub + 1)`).
    #[inline]
    pub fn num_slots(&self) -> usize {
        (self.sub + 1) * 2
    }

    /// Fill in the search hints from the emitted instructions.
    pub(crate) fn set_optimize_info(&mut self) {
        self.first_byte = None;
        self.anchored_start = false;
        for inst in &self.insts {
            match inst {
                Inst::Save(_) => continue,
                Inst::Char(c) => self.first_byte = Some(*c),
                Inst::AnchorStart => self.anchored_start = true,
                _ => {}
            }
            break;
        }
    }
}
