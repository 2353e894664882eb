use crate::core::Record;
use std::hash::{Hash, Hasher};

/// Template used when nothing else is specified: `-00003-of-00017`.
pub const DEFAULT_SHARD_TEMPLATE: &str = "-SSSSS-of-NNNNN";

/// Template used for windowed output: `-<window>-<pane>-00003-of-00017`.
pub const DEFAULT_WINDOWED_SHARD_TEMPLATE: &str = "-W-P-SSSSS-of-NNNNN";

/// How a sink names the files it produces.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FilenamePolicy {
    /// Prefix + expanded shard template + suffix.
    Template(DefaultFilenamePolicy),
    /// Naming logic owned by a runner or user library, identified by urn.
    Custom(CustomFilenamePolicy),
}

impl FilenamePolicy {
    /// Name of an unwindowed shard, when this policy can compute it locally.
    pub fn unwindowed_filename(&self, shard: u32, num_shards: u32) -> Option<String> {
        match self {
            FilenamePolicy::Template(policy) => Some(policy.unwindowed_filename(shard, num_shards)),
            FilenamePolicy::Custom(_) => None,
        }
    }

    pub fn windowed_filename(
        &self,
        shard: u32,
        num_shards: u32,
        window: &str,
        pane: u32,
    ) -> Option<String> {
        match self {
            FilenamePolicy::Template(policy) => {
                Some(policy.windowed_filename(shard, num_shards, window, pane))
            }
            FilenamePolicy::Custom(_) => None,
        }
    }
}

impl From<DefaultFilenamePolicy> for FilenamePolicy {
    fn from(policy: DefaultFilenamePolicy) -> Self {
        FilenamePolicy::Template(policy)
    }
}

impl From<CustomFilenamePolicy> for FilenamePolicy {
    fn from(policy: CustomFilenamePolicy) -> Self {
        FilenamePolicy::Custom(policy)
    }
}

/// Names files as `prefix + template + suffix`.
///
/// In the template, a run of `S` becomes the shard index, `N` the shard count,
/// `P` the pane index and `W` the window, each number zero-padded to the run length.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DefaultFilenamePolicy {
    pub(crate) prefix: String,
    pub(crate) shard_template: String,
    pub(crate) suffix: String,
}

impl DefaultFilenamePolicy {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            shard_template: DEFAULT_SHARD_TEMPLATE.to_string(),
            suffix: String::new(),
        }
    }

    pub fn with_shard_template(mut self, template: impl Into<String>) -> Self {
        self.shard_template = template.into();
        self
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn shard_template(&self) -> &str {
        &self.shard_template
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    pub fn unwindowed_filename(&self, shard: u32, num_shards: u32) -> String {
        self.construct_name(shard, num_shards, None)
    }

    pub fn windowed_filename(&self, shard: u32, num_shards: u32, window: &str, pane: u32) -> String {
        self.construct_name(shard, num_shards, Some((window, pane)))
    }

    fn construct_name(&self, shard: u32, num_shards: u32, window: Option<(&str, u32)>) -> String {
        let mut name = self.prefix.clone();
        let chars: Vec<char> = self.shard_template.chars().collect();
        let mut i = 0;
        while i < chars.len() {
            let c = chars[i];
            let mut run = 1;
            while i + run < chars.len() && chars[i + run] == c {
                run += 1;
            }
            match (c, window) {
                ('S', _) => name.push_str(&format!("{:0width$}", shard, width = run)),
                ('N', _) => name.push_str(&format!("{:0width$}", num_shards, width = run)),
                ('P', Some((_, pane))) => name.push_str(&format!("{:0width$}", pane, width = run)),
                ('W', Some((window, _))) => name.push_str(window),
                _ => name.extend(std::iter::repeat_n(c, run)),
            }
            i += run;
        }
        name.push_str(&self.suffix);
        name
    }
}

/// A naming strategy known only by urn, carried as opaque JSON state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomFilenamePolicy {
    pub(crate) urn: String,
    pub(crate) state: Record,
}

impl CustomFilenamePolicy {
    pub fn new(urn: impl Into<String>, state: Record) -> Self {
        Self {
            urn: urn.into(),
            state,
        }
    }

    pub fn urn(&self) -> &str {
        &self.urn
    }

    pub fn state(&self) -> &Record {
        &self.state
    }
}

impl Hash for CustomFilenamePolicy {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.urn.hash(state);
        // serde_json::Value has no Hash impl; its canonical text stands in.
        self.state.to_string().hash(state);
    }
}
