//! Origin admission.
//!
//! The allowed-origin set is parsed once from a comma-delimited value and never
//! mutated afterwards. [`OriginFilter::admit`] is a pure function of the
//! request origin and that set.

/// Delimiter between entries in the configured origin list.
pub const ORIGIN_DELIMITER: char = ',';

/// Immutable, ordered set of origins allowed to receive cross-origin responses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowedOrigins {
    entries: Vec<String>,
}

impl AllowedOrigins {
    /// Parse a delimited origin list.
    ///
    /// Entries are trimmed; empty entries are discarded. Anything malformed
    /// simply ends up as an entry no browser will ever send, so parsing cannot fail.
    pub fn parse(raw: &str) -> Self {
        let set: Self = raw.split(ORIGIN_DELIMITER).collect();
        tracing::debug!(count = set.len(), "allowed origins parsed");
        set
    }

    fn push(&mut self, entry: &str) {
        let entry = entry.trim();
        if entry.is_empty() || self.contains(entry) {
            return;
        }
        self.entries.push(entry.to_string());
    }

    /// Exact string match.
    pub fn contains(&self, origin: &str) -> bool {
        self.entries.iter().any(|e| e == origin)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for AllowedOrigins {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::default();
        for s in iter {
            set.push(s.as_ref());
        }
        set
    }
}

/// Outcome of an admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Cross-origin headers are attached (or not needed for same-origin).
    Admit { credentials: bool },
    /// No cross-origin headers are attached. Not an error.
    Deny,
}

impl Admission {
    pub fn is_admitted(self) -> bool {
        matches!(self, Admission::Admit { .. })
    }

    pub fn allows_credentials(self) -> bool {
        matches!(self, Admission::Admit { credentials: true })
    }
}

/// Per-request origin admission.
/// Construct once at startup, then share via Arc.
#[derive(Debug, Clone)]
pub struct OriginFilter {
    allowed: AllowedOrigins,
    credentials: bool,
}

impl OriginFilter {
    /// Filter that marks admitted requests as credentialed.
    pub fn new(allowed: AllowedOrigins) -> Self {
        Self { allowed, credentials: true }
    }

    pub fn with_credentials(mut self, credentials: bool) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn allowed(&self) -> &AllowedOrigins {
        &self.allowed
    }

    /// Decide whether `origin` may receive a cross-origin response.
    ///
    /// - absent (or empty) origin: same-origin or non-browser client, admit
    /// - origin listed verbatim: admit
    /// - anything else: deny
    pub fn admit(&self, origin: Option<&str>) -> Admission {
        match origin {
            None => self.granted(),
            Some(o) if o.is_empty() => self.granted(),
            Some(o) if self.allowed.contains(o) => self.granted(),
            Some(_) => Admission::Deny,
        }
    }

    fn granted(&self) -> Admission {
        Admission::Admit { credentials: self.credentials }
    }
}
