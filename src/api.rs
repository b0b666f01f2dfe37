// api.rs - Idiomatic Rust API for ure.
//
// Wraps the compiler and VM entry points (re_compile, re_match, re_search)
// with Rust-native types: Pattern, PatternBuilder, Match, Replacement.
// Every entry point, method or module-level function, goes through the
// same window validation and the same group validation.

use std::borrow::Cow;
use std::fmt;

use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::error::RegexError;
use crate::regcomp::re_compile;
use crate::regdef::CompileFlags;
use crate::regexec::{re_get_match_stack_limit, re_match, re_search, Captures, Subject};
use crate::regint::Program;

/// A compiled regular expression.
///
/// Subjects are byte strings; anything that is `AsRef<[u8]>` (`str`,
/// `String`, `[u8]`, `Vec<u8>`) can be searched.
///
/// # Examples
///
/// ```
/// use ure::api::Pattern;
///
/// let re = Pattern::new(r"(\d+)-(\d+)").unwrap();
/// let m = re.search("id 12-34 end").unwrap().unwrap();
/// assert_eq!(m.span(0).unwrap(), (3, 8));
/// assert_eq!(m.group(1).unwrap(), Some(&b"12"[..]));
/// assert_eq!(m.group(2).unwrap(), Some(&b"34"[..]));
/// ```
pub struct Pattern {
    prog: Program,
    source: Vec<u8>,
    match_stack_limit: u32,
}

impl Pattern {
    /// Compile a pattern with no flags and the current global limits.
    pub fn new(pattern: &str) -> Result<Pattern, RegexError> {
        PatternBuilder::new(pattern).build()
    }

    /// Compile a pattern given as raw bytes.
    pub fn new_bytes(pattern: &[u8]) -> Result<Pattern, RegexError> {
        PatternBuilder::new_bytes(pattern).build()
    }

    /// Create a [`PatternBuilder`] for fine-grained control over compilation.
    pub fn builder(pattern: &str) -> PatternBuilder {
        PatternBuilder::new(pattern)
    }

    /// Number of groups including the whole-match group 0.
    pub fn group_count(&self) -> usize {
        self.prog.sub + 1
    }

    /// The pattern source this was compiled from.
    pub fn as_bytes(&self) -> &[u8] {
        &self.source
    }

    /// Backtrack stack budget used by this pattern (`0` = unlimited).
    pub fn match_stack_limit(&self) -> u32 {
        self.match_stack_limit
    }

    /// Textual listing of the compiled program.
    pub fn dump(&self) -> String {
        self.prog.to_string()
    }

    /// Access the compiled program.
    pub fn as_program(&self) -> &Program {
        &self.prog
    }

    /// Whether the pattern matches anywhere in `subject`.
    pub fn is_match<S>(&self, subject: &S) -> Result<bool, RegexError>
    where
        S: AsRef<[u8]> + ?Sized,
    {
        Ok(self.search(subject)?.is_some())
    }

    /// Anchored match at the start of `subject`.
    pub fn match_at_start<'t, S>(&self, subject: &'t S) -> Result<Option<Match<'t>>, RegexError>
    where
        S: AsRef<[u8]> + ?Sized,
    {
        self.match_within(subject, 0, None)
    }

    /// Anchored match: succeeds only if a match begins exactly at `pos`.
    ///
    /// The window is `[pos, endpos)`; `endpos` defaults to the subject
    /// length and is capped to it. `pos` past the end, or an explicit
    /// `endpos <= pos`, is "no match" without running the matcher.
    pub fn match_within<'t, S>(
        &self,
        subject: &'t S,
        pos: usize,
        endpos: Option<usize>,
    ) -> Result<Option<Match<'t>>, RegexError>
    where
        S: AsRef<[u8]> + ?Sized,
    {
        let text = subject.as_ref();
        let Some(subj) = window(text, pos, endpos) else {
            return Ok(None);
        };
        let caps = re_match(&self.prog, &subj, pos, self.match_stack_limit)?;
        Ok(caps.map(|caps| Match::new(text, caps)))
    }

    /// Leftmost match anywhere in `subject`.
    pub fn search<'t, S>(&self, subject: &'t S) -> Result<Option<Match<'t>>, RegexError>
    where
        S: AsRef<[u8]> + ?Sized,
    {
        self.search_within(subject, 0, None)
    }

    /// Leftmost match starting anywhere in `[pos, endpos)`.
    ///
    /// Window rules are the same as [`Pattern::match_within`]. Offsets in
    /// the returned [`Match`] are relative to the start of `subject`.
    pub fn search_within<'t, S>(
        &self,
        subject: &'t S,
        pos: usize,
        endpos: Option<usize>,
    ) -> Result<Option<Match<'t>>, RegexError>
    where
        S: AsRef<[u8]> + ?Sized,
    {
        let text = subject.as_ref();
        let Some(subj) = window(text, pos, endpos) else {
            return Ok(None);
        };
        let caps = re_search(&self.prog, &subj, pos, self.match_stack_limit)?;
        Ok(caps.map(|caps| Match::new(text, caps)))
    }

    /// Split `subject` around matches of the pattern.
    ///
    /// At most `maxsplit` splits are made (`0` = unlimited); the remaining
    /// tail is always the last element. A zero-width match at the start of
    /// the current segment does not split; the search resumes one byte
    /// further. Patterns with capturing groups are rejected with
    /// [`RegexError::NotImplemented`].
    ///
    /// ```
    /// use ure::api::Pattern;
    ///
    /// let re = Pattern::new("a|b").unwrap();
    /// let parts = re.split("xaybzc", 0).unwrap();
    /// assert_eq!(parts, vec![&b"x"[..], b"y", b"z", b"c"]);
    /// ```
    pub fn split<'t, S>(&self, subject: &'t S, maxsplit: usize) -> Result<Vec<&'t [u8]>, RegexError>
    where
        S: AsRef<[u8]> + ?Sized,
    {
        if self.prog.sub > 0 {
            return Err(RegexError::NotImplemented("split with capturing groups"));
        }

        let text = subject.as_ref();
        let subj = Subject::new(text);
        let mut parts = Vec::new();
        let mut seg_start = 0;
        let mut cursor = 0;

        while cursor <= text.len() {
            let Some(caps) = re_search(&self.prog, &subj, cursor, self.match_stack_limit)? else {
                break;
            };
            let (ms, me) = whole_span(&caps);
            if ms == me && ms == seg_start {
                cursor = ms + 1;
                continue;
            }

            parts.push(&text[seg_start..ms]);
            trace!(target: "ure::api", start = ms, end = me, "split at match");
            seg_start = me;
            cursor = me;

            if maxsplit > 0 && parts.len() == maxsplit {
                break;
            }
        }

        parts.push(&text[seg_start..]);
        Ok(parts)
    }

    /// Replace matches in `subject`.
    ///
    /// At most `count` substitutions are made (`0` = unlimited). After a
    /// zero-width match one subject byte is copied through unchanged so the
    /// scan always advances. When nothing was substituted the subject is
    /// returned borrowed.
    ///
    /// ```
    /// use ure::api::Pattern;
    ///
    /// let re = Pattern::new(r"(\w+)@(\w+)").unwrap();
    /// let out = re.sub(r"\2 at \g<1>", "mail bob@home", 0).unwrap();
    /// assert_eq!(&*out, b"mail home at bob");
    /// ```
    pub fn sub<'t, 'r, S, R>(
        &self,
        replacement: R,
        subject: &'t S,
        count: usize,
    ) -> Result<Cow<'t, [u8]>, RegexError>
    where
        S: AsRef<[u8]> + ?Sized,
        R: Into<Replacement<'r>>,
    {
        let text = subject.as_ref();
        let subj = Subject::new(text);
        let mut expander = Expander::from(replacement.into());
        let mut out: Option<Vec<u8>> = None;
        let mut copied = 0;
        let mut cursor = 0;
        let mut done = 0;

        while cursor <= text.len() {
            let Some(caps) = re_search(&self.prog, &subj, cursor, self.match_stack_limit)? else {
                break;
            };
            let m = Match::new(text, caps);
            let (ms, me) = whole_span(&m.caps);

            let buf = out.get_or_insert_with(|| Vec::with_capacity(text.len()));
            buf.extend_from_slice(&text[copied..ms]);
            expander.expand(&m, buf)?;

            if ms == me {
                if me < text.len() {
                    buf.push(text[me]);
                }
                copied = (me + 1).min(text.len());
                cursor = me + 1;
            } else {
                copied = me;
                cursor = me;
            }
            trace!(target: "ure::api", start = ms, end = me, "substituted match");

            done += 1;
            if count > 0 && done == count {
                break;
            }
        }

        match out {
            None => Ok(Cow::Borrowed(text)),
            Some(mut buf) => {
                buf.extend_from_slice(&text[copied..]);
                Ok(Cow::Owned(buf))
            }
        }
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Pattern")
            .field(&String::from_utf8_lossy(&self.source))
            .finish()
    }
}

/// Window for match/search, or `None` when it cannot contain a match.
fn window(text: &[u8], pos: usize, endpos: Option<usize>) -> Option<Subject<'_>> {
    if pos > text.len() {
        return None;
    }
    let end = match endpos {
        Some(e) if e <= pos => return None,
        Some(e) => e.min(text.len()),
        None => text.len(),
    };
    Subject::window(text, pos, end)
}

fn whole_span(caps: &[Option<usize>]) -> (usize, usize) {
    // Group 0 is always set on a successful match.
    let start = caps.first().copied().flatten().unwrap_or(0);
    let end = caps.get(1).copied().flatten().unwrap_or(start);
    (start, end)
}

// === PatternBuilder ===

/// Builder for compiling a [`Pattern`] with flags or a per-pattern limit.
///
/// # Examples
///
/// ```
/// use ure::api::Pattern;
///
/// let re = Pattern::builder(r"(a*)*b")
///     .match_stack_limit(10_000)
///     .build()
///     .unwrap();
/// assert!(re.is_match("aaab").unwrap());
/// ```
pub struct PatternBuilder {
    pattern: Vec<u8>,
    flags: CompileFlags,
    match_stack_limit: Option<u32>,
}

impl PatternBuilder {
    /// Create a new builder for the given pattern.
    pub fn new(pattern: &str) -> Self {
        Self::new_bytes(pattern.as_bytes())
    }

    /// Create a new builder for a pattern given as raw bytes.
    pub fn new_bytes(pattern: &[u8]) -> Self {
        PatternBuilder {
            pattern: pattern.to_vec(),
            flags: CompileFlags::empty(),
            match_stack_limit: None,
        }
    }

    /// Replace the compile flags.
    pub fn flags(mut self, flags: CompileFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Enable or disable the program dump at compile time.
    pub fn debug(mut self, yes: bool) -> Self {
        self.flags.set(CompileFlags::DEBUG, yes);
        self
    }

    /// Override the global backtrack stack budget for this pattern.
    pub fn match_stack_limit(mut self, limit: u32) -> Self {
        self.match_stack_limit = Some(limit);
        self
    }

    /// Compile the pattern into a [`Pattern`].
    pub fn build(self) -> Result<Pattern, RegexError> {
        let prog = re_compile(&self.pattern)?;
        if self.flags.contains(CompileFlags::DEBUG) {
            debug!(
                target: "ure::compile",
                pattern = %String::from_utf8_lossy(&self.pattern),
                "program:\n{}",
                prog
            );
        }
        Ok(Pattern {
            prog,
            source: self.pattern,
            match_stack_limit: self.match_stack_limit.unwrap_or_else(re_get_match_stack_limit),
        })
    }
}

// === Match ===

/// A successful match: a snapshot of the capture offsets plus the subject.
///
/// Offsets are relative to the start of the subject, never to a narrowed
/// search window.
#[derive(Clone)]
pub struct Match<'t> {
    text: &'t [u8],
    caps: SmallVec<[Option<usize>; 8]>,
}

impl<'t> Match<'t> {
    fn new(text: &'t [u8], caps: Captures) -> Self {
        Match {
            text,
            caps: SmallVec::from_vec(caps),
        }
    }

    /// Number of groups including group 0.
    pub fn group_count(&self) -> usize {
        self.caps.len() / 2
    }

    /// Shared group validation for every accessor.
    fn group_bounds(&self, n: usize) -> Result<Option<(usize, usize)>, RegexError> {
        if n >= self.group_count() {
            return Err(RegexError::NoSuchGroup(n));
        }
        Ok(match (self.caps[n * 2], self.caps[n * 2 + 1]) {
            (Some(s), Some(e)) => Some((s, e)),
            _ => None,
        })
    }

    /// Text of group `n`, or `None` if the group did not participate.
    pub fn group(&self, n: usize) -> Result<Option<&'t [u8]>, RegexError> {
        Ok(self.group_bounds(n)?.map(|(s, e)| &self.text[s..e]))
    }

    /// Groups `1..group_count`, excluding the whole match.
    pub fn groups(&self) -> Vec<Option<&'t [u8]>> {
        (1..self.group_count())
            .map(|n| self.group_bounds(n).ok().flatten().map(|(s, e)| &self.text[s..e]))
            .collect()
    }

    /// `(start, end)` of group `n`, `(-1, -1)` if it did not participate.
    pub fn span(&self, n: usize) -> Result<(isize, isize), RegexError> {
        Ok(match self.group_bounds(n)? {
            Some((s, e)) => (s as isize, e as isize),
            None => (-1, -1),
        })
    }

    pub fn start(&self, n: usize) -> Result<isize, RegexError> {
        Ok(self.span(n)?.0)
    }

    pub fn end(&self, n: usize) -> Result<isize, RegexError> {
        Ok(self.span(n)?.1)
    }

    /// The whole match as bytes.
    pub fn as_bytes(&self) -> &'t [u8] {
        let (s, e) = whole_span(&self.caps);
        &self.text[s..e]
    }

    /// The whole match as a `&str`.
    ///
    /// # Panics
    ///
    /// Panics if the matched bytes are not valid UTF-8.
    pub fn as_str(&self) -> &'t str {
        std::str::from_utf8(self.as_bytes()).expect("match is not valid UTF-8")
    }
}

impl fmt::Display for Match<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<match num={}>", self.group_count())
    }
}

impl fmt::Debug for Match<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Match")
            .field("num", &self.group_count())
            .field("span", &whole_span(&self.caps))
            .finish()
    }
}

// === Replacement ===

/// What `sub` inserts for each match.
///
/// A template is scanned for backreferences: `\N` and `\g<N>` insert the
/// text of group `N` (nothing if the group did not participate), `\` before
/// any other byte drops the backslash, and a trailing `\` is dropped. A
/// callback's output is inserted verbatim.
pub enum Replacement<'r> {
    Template(&'r [u8]),
    Callback(Box<dyn FnMut(&Match<'_>) -> Vec<u8> + 'r>),
}

impl<'r> Replacement<'r> {
    /// Wrap a closure computing the replacement from each match.
    ///
    /// ```
    /// use ure::api::{Pattern, Replacement};
    ///
    /// let re = Pattern::new(r"\d+").unwrap();
    /// let out = re
    ///     .sub(Replacement::callback(|m| format!("<{}>", m.as_str().len())), "a 123 b 45", 0)
    ///     .unwrap();
    /// assert_eq!(&*out, b"a <3> b <2>");
    /// ```
    pub fn callback<F, T>(mut f: F) -> Self
    where
        F: FnMut(&Match<'_>) -> T + 'r,
        T: AsRef<[u8]>,
    {
        Replacement::Callback(Box::new(move |m| f(m).as_ref().to_vec()))
    }
}

impl<'r> From<&'r str> for Replacement<'r> {
    fn from(t: &'r str) -> Self {
        Replacement::Template(t.as_bytes())
    }
}

impl<'r> From<&'r String> for Replacement<'r> {
    fn from(t: &'r String) -> Self {
        Replacement::Template(t.as_bytes())
    }
}

impl<'r> From<&'r [u8]> for Replacement<'r> {
    fn from(t: &'r [u8]) -> Self {
        Replacement::Template(t)
    }
}

impl<'r, const N: usize> From<&'r [u8; N]> for Replacement<'r> {
    fn from(t: &'r [u8; N]) -> Self {
        Replacement::Template(t)
    }
}

impl fmt::Debug for Replacement<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Replacement::Template(t) => f
                .debug_tuple("Template")
                .field(&String::from_utf8_lossy(t))
                .finish(),
            Replacement::Callback(_) => f.write_str("Callback(..)"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TemplatePiece<'r> {
    Literal(&'r [u8]),
    Group(usize),
}

/// Split a template into literal runs and group references.
fn parse_template(t: &[u8]) -> Vec<TemplatePiece<'_>> {
    let mut pieces = Vec::new();
    let mut lit_start = 0;
    let mut i = 0;

    while i < t.len() {
        if t[i] != b'\\' {
            i += 1;
            continue;
        }
        if lit_start < i {
            pieces.push(TemplatePiece::Literal(&t[lit_start..i]));
        }
        i += 1;

        let mut g_form = false;
        if t.get(i) == Some(&b'g')
            && t.get(i + 1) == Some(&b'<')
            && t.get(i + 2).is_some_and(u8::is_ascii_digit)
        {
            i += 2;
            g_form = true;
        }

        if t.get(i).is_some_and(u8::is_ascii_digit) {
            let mut n: usize = 0;
            while let Some(d) = t.get(i).filter(|c| c.is_ascii_digit()) {
                n = n.saturating_mul(10).saturating_add((d - b'0') as usize);
                i += 1;
            }
            if g_form && t.get(i) == Some(&b'>') {
                i += 1;
            }
            pieces.push(TemplatePiece::Group(n));
            lit_start = i;
        } else {
            // Escaped byte is kept literally, even another backslash.
            lit_start = i;
            i += 1;
        }
    }

    if lit_start < t.len() {
        pieces.push(TemplatePiece::Literal(&t[lit_start..]));
    }
    pieces
}

/// A [`Replacement`] resolved once before the substitution loop.
enum Expander<'r> {
    Template(Vec<TemplatePiece<'r>>),
    Callback(Box<dyn FnMut(&Match<'_>) -> Vec<u8> + 'r>),
}

impl<'r> From<Replacement<'r>> for Expander<'r> {
    fn from(r: Replacement<'r>) -> Self {
        match r {
            Replacement::Template(t) => Expander::Template(parse_template(t)),
            Replacement::Callback(f) => Expander::Callback(f),
        }
    }
}

impl Expander<'_> {
    fn expand(&mut self, m: &Match<'_>, out: &mut Vec<u8>) -> Result<(), RegexError> {
        match self {
            Expander::Template(pieces) => {
                for piece in pieces.iter() {
                    match *piece {
                        TemplatePiece::Literal(lit) => out.extend_from_slice(lit),
                        TemplatePiece::Group(n) => {
                            if let Some(text) = m.group(n)? {
                                out.extend_from_slice(text);
                            }
                        }
                    }
                }
            }
            Expander::Callback(f) => out.extend_from_slice(&f(m)),
        }
        Ok(())
    }
}

// === Module-level functions ===

/// Compile `pattern` with `flags`.
pub fn compile<P>(pattern: &P, flags: CompileFlags) -> Result<Pattern, RegexError>
where
    P: AsRef<[u8]> + ?Sized,
{
    PatternBuilder::new_bytes(pattern.as_ref()).flags(flags).build()
}

/// Compile `pattern` and run [`Pattern::is_match`].
pub fn is_match<P, S>(pattern: &P, subject: &S) -> Result<bool, RegexError>
where
    P: AsRef<[u8]> + ?Sized,
    S: AsRef<[u8]> + ?Sized,
{
    compile(pattern, CompileFlags::empty())?.is_match(subject)
}

/// Compile `pattern` and run [`Pattern::match_at_start`].
pub fn match_at_start<'t, P, S>(pattern: &P, subject: &'t S) -> Result<Option<Match<'t>>, RegexError>
where
    P: AsRef<[u8]> + ?Sized,
    S: AsRef<[u8]> + ?Sized,
{
    compile(pattern, CompileFlags::empty())?.match_at_start(subject)
}

/// Compile `pattern` and run [`Pattern::search`].
pub fn search<'t, P, S>(pattern: &P, subject: &'t S) -> Result<Option<Match<'t>>, RegexError>
where
    P: AsRef<[u8]> + ?Sized,
    S: AsRef<[u8]> + ?Sized,
{
    compile(pattern, CompileFlags::empty())?.search(subject)
}

/// Compile `pattern` and run [`Pattern::split`].
pub fn split<'t, P, S>(pattern: &P, subject: &'t S, maxsplit: usize) -> Result<Vec<&'t [u8]>, RegexError>
where
    P: AsRef<[u8]> + ?Sized,
    S: AsRef<[u8]> + ?Sized,
{
    compile(pattern, CompileFlags::empty())?.split(subject, maxsplit)
}

/// Compile `pattern` and run [`Pattern::sub`].
pub fn sub<'t, 'r, P, R, S>(
    pattern: &P,
    replacement: R,
    subject: &'t S,
    count: usize,
) -> Result<Cow<'t, [u8]>, RegexError>
where
    P: AsRef<[u8]> + ?Sized,
    R: Into<Replacement<'r>>,
    S: AsRef<[u8]> + ?Sized,
{
    compile(pattern, CompileFlags::empty())?.sub(replacement, subject, count)
}
