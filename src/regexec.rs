// regexec.rs - VM executor
// Bytecode interpreter (match_at) and the unanchored search driver.
//
// Backtracking uses an explicit stack of choice points and undo records
// instead of host recursion, so the depth guard is a plain length check.
// Structure: global limits → stack types → stack operations → match_at →
// re_match / re_search.

use std::sync::atomic::{AtomicU32, Ordering};

use tracing::warn;

use crate::regdef::*;
use crate::regint::*;

// ============================================================================
// Global Limits
// ============================================================================

static MATCH_STACK_LIMIT: AtomicU32 = AtomicU32::new(DEFAULT_MATCH_STACK_LIMIT_SIZE);

/// Set the default backtrack stack budget for patterns compiled afterwards.
/// `0` means unlimited.
pub fn re_set_match_stack_limit(n: u32) {
    MATCH_STACK_LIMIT.store(n, Ordering::Relaxed);
}

pub fn re_get_match_stack_limit() -> u32 {
    MATCH_STACK_LIMIT.load(Ordering::Relaxed)
}

#[cfg(test)]
thread_local! {
    /// Number of match_at invocations on this thread.
    pub(crate) static MATCH_AT_CALLS: std::cell::Cell<usize> = const { std::cell::Cell::new(0) };
}

// ============================================================================
// Subject
// ============================================================================

/// Half-open window `[begin, end)` over borrowed subject text.
///
/// `^` matches only at `begin`, `$` only at `end`; offsets stay relative to
/// the start of `text`.
#[derive(Clone, Copy, Debug)]
pub struct Subject<'t> {
    pub text: &'t [u8],
    pub begin: usize,
    pub end: usize,
}

impl<'t> Subject<'t> {
    pub fn new(text: &'t [u8]) -> Self {
        Subject {
            text,
            begin: 0,
            end: text.len(),
        }
    }

    /// Narrowed window; `None` if it would violate `begin <= end <= len`.
    pub fn window(text: &'t [u8], begin: usize, end: usize) -> Option<Self> {
        if begin <= end && end <= text.len() {
            Some(Subject { text, begin, end })
        } else {
            None
        }
    }
}

/// Capture buffer: `[start0, end0, start1, end1, ...]`, `None` when unset.
pub type Captures = Vec<Option<usize>>;

// ============================================================================
// Stack Types
// ============================================================================

#[derive(Clone, Copy, Debug)]
enum StackEntry {
    /// Choice point: resume at `pcode` with subject position `pstr`.
    Alt { pcode: InstAddr, pstr: usize },
    /// Capture slot value before a `Save` overwrote it.
    SaveUndo { slot: SlotNum, prev: Option<usize> },
    /// Empty-check register value before `EmptyCheckStart` overwrote it.
    EmptyCheckUndo { id: EmptyCheckId, prev: Option<usize> },
}

const INIT_MATCH_STACK_SIZE: usize = 64;

// ============================================================================
// Stack operations
// ============================================================================

#[inline]
fn stack_push(stack: &mut Vec<StackEntry>, entry: StackEntry, limit: u32) -> Result<(), i32> {
    if limit != 0 && stack.len() >= limit as usize {
        return Err(REERR_MATCH_STACK_LIMIT_OVER);
    }
    stack.push(entry);
    Ok(())
}

/// Pop to the most recent choice point, undoing register writes on the way.
fn stack_pop(
    stack: &mut Vec<StackEntry>,
    caps: &mut [Option<usize>],
    empty_checks: &mut [Option<usize>],
) -> Option<(InstAddr, usize)> {
    loop {
        match stack.pop()? {
            StackEntry::Alt { pcode, pstr } => return Some((pcode, pstr)),
            StackEntry::SaveUndo { slot, prev } => caps[slot] = prev,
            StackEntry::EmptyCheckUndo { id, prev } => empty_checks[id] = prev,
        }
    }
}

// ============================================================================
// match_at - the core VM executor
// ============================================================================

/// Run `reg` anchored at `sstart`. On success `caps` holds the capture
/// offsets; on failure its contents are unspecified.
pub fn match_at(
    reg: &Program,
    subj: &Subject<'_>,
    sstart: usize,
    caps: &mut [Option<usize>],
    stack_limit: u32,
) -> Result<bool, i32> {
    #[cfg(test)]
    MATCH_AT_CALLS.with(|c| c.set(c.get() + 1));

    let text = subj.text;
    let mut p: InstAddr = 0;
    let mut s: usize = sstart;
    let mut stack: Vec<StackEntry> = Vec::with_capacity(INIT_MATCH_STACK_SIZE);
    let mut empty_checks: Vec<Option<usize>> = vec![None; reg.num_empty_check];

    loop {
        let mut goto_fail = false;

        match &reg.insts[p] {
            Inst::Char(_) | Inst::Any | Inst::Class { .. } => {
                if s < subj.end && reg.insts[p].matches_byte(text[s]) {
                    s += 1;
                    p += 1;
                } else {
                    goto_fail = true;
                }
            }

            Inst::Match => return Ok(true),

            Inst::Jump(addr) => p = *addr,

            Inst::Split(first, second) => {
                stack_push(&mut stack, StackEntry::Alt { pcode: *second, pstr: s }, stack_limit)?;
                p = *first;
            }

            Inst::Save(slot) => {
                stack_push(
                    &mut stack,
                    StackEntry::SaveUndo { slot: *slot, prev: caps[*slot] },
                    stack_limit,
                )?;
                caps[*slot] = Some(s);
                p += 1;
            }

            Inst::AnchorStart => {
                if s == subj.begin {
                    p += 1;
                } else {
                    goto_fail = true;
                }
            }

            Inst::AnchorEnd => {
                if s == subj.end {
                    p += 1;
                } else {
                    goto_fail = true;
                }
            }

            Inst::EmptyCheckStart(id) => {
                stack_push(
                    &mut stack,
                    StackEntry::EmptyCheckUndo { id: *id, prev: empty_checks[*id] },
                    stack_limit,
                )?;
                empty_checks[*id] = Some(s);
                p += 1;
            }

            Inst::EmptyCheckEnd(id) => {
                if empty_checks[*id] == Some(s) {
                    // Body consumed nothing: leave the loop.
                    p += 2;
                } else {
                    p += 1;
                }
            }
        }

        if goto_fail {
            match stack_pop(&mut stack, caps, &mut empty_checks) {
                Some((pcode, pstr)) => {
                    p = pcode;
                    s = pstr;
                }
                None => return Ok(false),
            }
        }
    }
}

// ============================================================================
// re_match / re_search
// ============================================================================

fn finish_captures(reg: &Program, caps: &mut Captures) {
    // A slot pair is either fully set or fully unset.
    for pair in caps.chunks_mut(2).take(reg.sub + 1) {
        if pair[0].is_none() || pair[1].is_none() {
            pair[0] = None;
            pair[1] = None;
        }
    }
}

fn limit_over(code: i32) -> i32 {
    if code == REERR_MATCH_STACK_LIMIT_OVER {
        warn!(target: "ure::exec", "match stack limit exceeded, match attempt aborted");
    }
    code
}

/// Anchored match: succeeds only if a match starts exactly at `at`.
pub fn re_match(
    reg: &Program,
    subj: &Subject<'_>,
    at: usize,
    stack_limit: u32,
) -> Result<Option<Captures>, i32> {
    if at > subj.end {
        return Ok(None);
    }
    let mut caps: Captures = vec![None; reg.num_slots()];
    if match_at(reg, subj, at, &mut caps, stack_limit).map_err(limit_over)? {
        finish_captures(reg, &mut caps);
        Ok(Some(caps))
    } else {
        Ok(None)
    }
}

/// Unanchored search: try `start`, `start + 1`, ... up to `subj.end` and
/// return the captures of the first position that matches.
pub fn re_search(
    reg: &Program,
    subj: &Subject<'_>,
    start: usize,
    stack_limit: u32,
) -> Result<Option<Captures>, i32> {
    if start > subj.end {
        return Ok(None);
    }
    if reg.anchored_start {
        return if start == subj.begin {
            re_match(reg, subj, start, stack_limit)
        } else {
            Ok(None)
        };
    }

    let mut caps: Captures = vec![None; reg.num_slots()];
    let mut s = start;
    loop {
        if let Some(c) = reg.first_byte {
            match memchr::memchr(c, &subj.text[s..subj.end]) {
                Some(off) => s += off,
                None => return Ok(None),
            }
        }

        caps.iter_mut().for_each(|slot| *slot = None);
        if match_at(reg, subj, s, &mut caps, stack_limit).map_err(limit_over)? {
            finish_captures(reg, &mut caps);
            return Ok(Some(caps));
        }

        if s >= subj.end {
            return Ok(None);
        }
        s += 1;
    }
}

// ============================================================================
// Tests
// ============================================================================
