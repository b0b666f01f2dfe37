// regdump.rs - Program listing
// Human-readable disassembly of a compiled Program, used by `Pattern::dump`
// and the DEBUG compile flag.

use std::fmt;

use crate::regint::{ByteRange, Inst, Program};

fn fmt_byte(f: &mut fmt::Formatter<'_>, c: u8) -> fmt::Result {
    match c {
        b'\n' => f.write_str("\\n"),
        b'\t' => f.write_str("\\t"),
        b'\r' => f.write_str("\\r"),
        b'\\' => f.write_str("\\\\"),
        0x20..=0x7e => write!(f, "{}", c as char),
        _ => write!(f, "\\x{:02x}", c),
    }
}

fn fmt_ranges(f: &mut fmt::Formatter<'_>, ranges: &[ByteRange]) -> fmt::Result {
    for &(lo, hi) in ranges {
        fmt_byte(f, lo)?;
        if hi != lo {
            f.write_str("-")?;
            fmt_byte(f, hi)?;
        }
    }
    Ok(())
}

impl fmt::Display for Inst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Inst::Char(c) => {
                f.write_str("char '")?;
                fmt_byte(f, *c)?;
                f.write_str("'")
            }
            Inst::Any => f.write_str("any"),
            Inst::Class { ranges, negated } => {
                f.write_str(if *negated { "class [^" } else { "class [" })?;
                fmt_ranges(f, ranges)?;
                f.write_str("]")
            }
            Inst::Match => f.write_str("match"),
            Inst::Jump(to) => write!(f, "jump {}", to),
            Inst::Split(x, y) => write!(f, "split {}, {}", x, y),
            Inst::Save(slot) => write!(f, "save {}", slot),
            Inst::AnchorStart => f.write_str("begin"),
            Inst::AnchorEnd => f.write_str("end"),
            Inst::EmptyCheckStart(id) => write!(f, "empty-check-start {}", id),
            Inst::EmptyCheckEnd(id) => write!(f, "empty-check-end {}", id),
        }
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (pc, inst) in self.insts.iter().enumerate() {
            writeln!(f, "{:4}: {}", pc, inst)?;
        }
        write!(f, "groups: {}", self.sub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    #[test]
    fn dump_lists_every_instruction() {
        let mut prog = Program::with_capacity(5);
        prog.insts = vec![
            Inst::Save(0),
            Inst::Split(2, 3),
            Inst::Char(b'a'),
            Inst::Save(1),
            Inst::Match,
        ];
        let text = prog.to_string();
        assert_eq!(
            text,
            "   0: save 0\n   1: split 2, 3\n   2: char 'a'\n   3: save 1\n   4: match\ngroups: 0"
        );
    }

    #[test]
    fn class_and_escapes() {
        let cls = Inst::Class { ranges: smallvec![(b'0', b'9'), (b'\n', b'\n')], negated: true };
        assert_eq!(cls.to_string(), "class [^0-9\\n]");
        assert_eq!(Inst::Char(0x01).to_string(), "char '\\x01'");
        assert_eq!(Inst::EmptyCheckEnd(3).to_string(), "empty-check-end 3");
    }
}
