//! Primitive restriction filter.
//!
//! A restrict rule is a comma-separated list of tokens evaluated left to
//! right against a working list of ranges:
//!
//! - `N` or `N1-N2` appends an inclusive range.
//! - `!N` or `!N1-N2` removes that range from every entry collected so far.
//!   When nothing has been collected yet the exclusion starts from the full
//!   `[0, MAX_PRIM_COUNT]` domain instead.
//!
//! An empty rule or `*` lifts the restriction. Rules are compiled into a new
//! list before anything is committed, so a malformed token leaves the active
//! filter untouched.

use crate::{RestrictRuleError, TokenFault};

/// Largest primitive ordinal a range can reach.
pub const MAX_PRIM_COUNT: u32 = u32::MAX;

/// Closed range of primitive ordinals.
///
/// A range whose `first` exceeds its `last` is inert and never matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct PrimRange {
    /// First ordinal included.
    pub first: u32,
    /// Last ordinal included.
    pub last: u32,
}

impl PrimRange {
    /// Canonical inert range left behind when an exclusion swallows an entry.
    pub const EMPTY: Self = Self { first: 1, last: 0 };

    /// Creates a range covering `first..=last`.
    #[must_use]
    pub const fn new(first: u32, last: u32) -> Self {
        Self { first, last }
    }

    /// Creates a range covering exactly one ordinal.
    #[must_use]
    pub const fn single(n: u32) -> Self {
        Self { first: n, last: n }
    }

    /// Returns true for inert ranges.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.first > self.last
    }

    /// Returns true when `n` lies inside this range.
    #[must_use]
    pub const fn contains(self, n: u32) -> bool {
        self.first <= n && n <= self.last
    }

    const fn disjoint(self, cut: Self) -> bool {
        self.last < cut.first || self.first > cut.last
    }

    fn subtract(self, cut: Self) -> Remainder {
        if self.is_empty() || cut.is_empty() || self.disjoint(cut) {
            return Remainder::One(self);
        }
        if self.first >= cut.first && self.last <= cut.last {
            return Remainder::One(Self::EMPTY);
        }
        if self.first < cut.first && self.last > cut.last {
            return Remainder::Two(
                Self::new(self.first, cut.first - 1),
                Self::new(cut.last + 1, self.last),
            );
        }
        if self.first < cut.first {
            Remainder::One(Self::new(self.first, cut.first - 1))
        } else {
            Remainder::One(Self::new(cut.last + 1, self.last))
        }
    }

    fn complement(self) -> Vec<Self> {
        if self.is_empty() {
            return vec![Self::new(0, MAX_PRIM_COUNT)];
        }
        let mut out = Vec::with_capacity(2);
        if self.first > 0 {
            out.push(Self::new(0, self.first - 1));
        }
        if self.last < MAX_PRIM_COUNT {
            out.push(Self::new(self.last + 1, MAX_PRIM_COUNT));
        }
        if out.is_empty() {
            // Everything excluded; keep a marker so the list does not read
            // as "unrestricted".
            out.push(Self::EMPTY);
        }
        out
    }
}

enum Remainder {
    One(PrimRange),
    Two(PrimRange, PrimRange),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RuleToken {
    Include(PrimRange),
    Exclude(PrimRange),
}

/// Returns true when `rule` lifts the restriction entirely.
#[must_use]
pub fn is_clear_rule(rule: &str) -> bool {
    matches!(rule.trim(), "" | "*")
}

/// Compiles a restrict rule into its range list without committing it.
///
/// Returns an empty list for clearing rules.
///
/// # Errors
///
/// Returns [`RestrictRuleError`] naming the first token that is not `N`,
/// `N1-N2`, `!N` or `!N1-N2`.
pub fn compile_rule(rule: &str) -> Result<Vec<PrimRange>, RestrictRuleError> {
    if is_clear_rule(rule) {
        return Ok(Vec::new());
    }

    rule.split(',')
        .map(parse_token)
        .try_fold(Vec::new(), |ranges, token| Ok(apply_token(&ranges, token?)))
}

fn apply_token(ranges: &[PrimRange], token: RuleToken) -> Vec<PrimRange> {
    match token {
        RuleToken::Include(range) => {
            let mut next = ranges.to_vec();
            next.push(range);
            next
        }
        RuleToken::Exclude(cut) if ranges.is_empty() => cut.complement(),
        RuleToken::Exclude(cut) => {
            let mut next = Vec::with_capacity(ranges.len() + 1);
            let mut split_tails = Vec::new();
            for range in ranges {
                match range.subtract(cut) {
                    Remainder::One(kept) => next.push(kept),
                    Remainder::Two(head, tail) => {
                        next.push(head);
                        split_tails.push(tail);
                    }
                }
            }
            next.extend(split_tails);
            next
        }
    }
}

fn parse_token(raw: &str) -> Result<RuleToken, RestrictRuleError> {
    let token = raw.trim();
    match token.strip_prefix('!') {
        Some(rest) => parse_range(rest, raw).map(RuleToken::Exclude),
        None => parse_range(token, raw).map(RuleToken::Include),
    }
}

fn parse_range(text: &str, raw: &str) -> Result<PrimRange, RestrictRuleError> {
    if text.is_empty() {
        return Err(RestrictRuleError::new(raw, TokenFault::Empty));
    }
    match text.split_once('-') {
        Some((first, last)) => Ok(PrimRange::new(
            parse_count(first, raw)?,
            parse_count(last, raw)?,
        )),
        None => parse_count(text, raw).map(PrimRange::single),
    }
}

fn parse_count(digits: &str, raw: &str) -> Result<u32, RestrictRuleError> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(RestrictRuleError::new(raw, TokenFault::InvalidNumber));
    }
    digits
        .parse()
        .map_err(|_| RestrictRuleError::new(raw, TokenFault::Overflow))
}

/// Committed primitive restriction plus the rule text it came from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrimFilter {
    ranges: Vec<PrimRange>,
    rule: String,
}

impl PrimFilter {
    /// Creates an unrestricted filter.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            ranges: Vec::new(),
            rule: String::new(),
        }
    }

    /// Replaces the committed rule.
    ///
    /// Clearing rules (`""`, `*`) reset the stored rule text to empty.
    ///
    /// # Errors
    ///
    /// Returns [`RestrictRuleError`] for a malformed token; the previously
    /// committed ranges and rule text are kept as they were.
    pub fn set_rule(&mut self, rule: &str) -> Result<(), RestrictRuleError> {
        if is_clear_rule(rule) {
            self.clear();
            return Ok(());
        }
        let ranges = compile_rule(rule)?;
        self.ranges = ranges;
        self.rule = rule.to_owned();
        Ok(())
    }

    /// Lifts the restriction.
    pub fn clear(&mut self) {
        self.ranges.clear();
        self.rule.clear();
    }

    /// Last successfully committed rule, verbatim.
    #[must_use]
    pub fn rule(&self) -> &str {
        &self.rule
    }

    /// Committed ranges, including inert entries.
    #[must_use]
    pub fn ranges(&self) -> &[PrimRange] {
        &self.ranges
    }

    /// Returns true when no restriction is active.
    #[must_use]
    pub fn is_unrestricted(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Returns true when primitive ordinal `n` should be processed.
    #[must_use]
    pub fn passes(&self, n: u32) -> bool {
        self.ranges.is_empty() || self.ranges.iter().any(|range| range.contains(n))
    }
}
