use std::collections::HashMap;

use smellscope_core::{ContextPolicy, ScopeHint};

/// Key whose config entry replaces the fallback policy.
pub const DEFAULT_RULE: &str = "default";

/// Immutable mapping from rule id to context policy, with a fallback for
/// unknown rules.
///
/// The catalog is plain data. It is handed to the extractor at
/// construction time, so tests and per-repository configuration can swap
/// it wholesale instead of patching a process-wide table.
///
/// # Examples
///
/// ```
/// use smellscope_context::catalog::RuleCatalog;
///
/// let catalog = RuleCatalog::builtin();
/// let policy = catalog.policy_for("java:S1488");
/// assert_eq!((policy.lines_above, policy.lines_below), (2, 3));
///
/// // Unknown rules fall back to the default policy, never an error.
/// let fallback = catalog.policy_for("java:S9999");
/// assert_eq!(fallback, catalog.default_policy());
/// ```
#[derive(Debug, Clone)]
pub struct RuleCatalog {
    rules: HashMap<String, ContextPolicy>,
    default: ContextPolicy,
}

const fn policy(
    lines_above: u32,
    lines_below: u32,
    scope: ScopeHint,
    needs_wider_context: bool,
) -> ContextPolicy {
    ContextPolicy {
        lines_above,
        lines_below,
        scope,
        needs_wider_context,
    }
}

/// Built-in policies for common SonarJava smells.
///
/// Small declaration-level rules get a tight window; method- and
/// class-level rules get room to show the whole construct.
const BUILTIN_RULES: &[(&str, ContextPolicy)] = &[
    ("java:S107", policy(2, 10, ScopeHint::Method, true)),
    ("java:S138", policy(2, 40, ScopeHint::Method, true)),
    ("java:S1066", policy(2, 8, ScopeHint::Block, false)),
    ("java:S1068", policy(2, 2, ScopeHint::Field, false)),
    ("java:S1144", policy(2, 12, ScopeHint::Method, false)),
    ("java:S1172", policy(2, 8, ScopeHint::Method, false)),
    ("java:S1186", policy(2, 4, ScopeHint::Method, false)),
    ("java:S1200", policy(5, 40, ScopeHint::Class, true)),
    ("java:S1448", policy(5, 60, ScopeHint::Class, true)),
    ("java:S1481", policy(2, 3, ScopeHint::Block, false)),
    ("java:S1488", policy(2, 3, ScopeHint::Block, false)),
    ("java:S1541", policy(2, 25, ScopeHint::Method, true)),
    ("java:S2095", policy(4, 10, ScopeHint::Block, false)),
    ("java:S3776", policy(3, 30, ScopeHint::Method, true)),
];

const DEFAULT_POLICY: ContextPolicy = policy(3, 5, ScopeHint::Block, false);

impl RuleCatalog {
    /// The built-in catalog.
    pub fn builtin() -> Self {
        let rules = BUILTIN_RULES
            .iter()
            .map(|(id, p)| ((*id).to_string(), *p))
            .collect();
        Self {
            rules,
            default: DEFAULT_POLICY,
        }
    }

    /// An empty catalog with only the given fallback policy.
    ///
    /// Useful as a test double.
    pub fn empty(default: ContextPolicy) -> Self {
        Self {
            rules: HashMap::new(),
            default,
        }
    }

    /// Layer per-repository overrides on top of this catalog.
    ///
    /// An entry keyed [`DEFAULT_RULE`] replaces the fallback policy; any
    /// other key inserts or replaces that rule's policy.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::collections::HashMap;
    /// use smellscope_context::catalog::RuleCatalog;
    /// use smellscope_core::{ContextPolicy, ScopeHint};
    ///
    /// let mut overrides = HashMap::new();
    /// overrides.insert(
    ///     "java:S1488".to_string(),
    ///     ContextPolicy { lines_above: 1, lines_below: 1, scope: ScopeHint::Block, needs_wider_context: false },
    /// );
    /// let catalog = RuleCatalog::builtin().with_overrides(&overrides);
    /// assert_eq!(catalog.policy_for("java:S1488").lines_above, 1);
    /// ```
    pub fn with_overrides(mut self, overrides: &HashMap<String, ContextPolicy>) -> Self {
        for (rule_id, policy) in overrides {
            if rule_id == DEFAULT_RULE {
                self.default = *policy;
            } else {
                self.rules.insert(rule_id.clone(), *policy);
            }
        }
        self
    }

    /// Look up the policy for `rule_id`, falling back to the default.
    pub fn policy_for(&self, rule_id: &str) -> ContextPolicy {
        self.rules.get(rule_id).copied().unwrap_or(self.default)
    }

    /// The fallback policy used for unknown rules.
    pub fn default_policy(&self) -> ContextPolicy {
        self.default
    }

    /// Iterate over the cataloged rules in sorted id order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, ContextPolicy)> {
        let mut entries: Vec<_> = self.rules.iter().map(|(id, p)| (id.as_str(), *p)).collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries.into_iter()
    }

    /// Number of cataloged rules, excluding the fallback.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns `true` if no rules are cataloged.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RuleCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
