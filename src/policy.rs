/// Role
///
/// The role claim carried by a verified credential. Anything outside the three
/// known values parses to `Unrecognized` and keeps its raw text for logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Role {
    User,
    Admin,
    SuperAdmin,
    Unrecognized(String),
}

impl Role {
    /// Parses the raw claim. Matching is exact and case-sensitive.
    pub fn from_claim(raw: &str) -> Self {
        match raw {
            "user" => Role::User,
            "admin" => Role::Admin,
            "superadmin" => Role::SuperAdmin,
            other => Role::Unrecognized(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
            Role::SuperAdmin => "superadmin",
            Role::Unrecognized(raw) => raw,
        }
    }
}

/// Decision
///
/// The three-way outcome of the access procedure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    RedirectToLogin,
    RedirectToDefault,
}

#[derive(Debug, Clone)]
pub enum PathMatch {
    Any,
    /// Case-sensitive `starts_with` against each prefix, in order.
    Prefixes(Vec<String>),
}

impl PathMatch {
    fn matches(&self, path: &str) -> bool {
        match self {
            PathMatch::Any => true,
            PathMatch::Prefixes(prefixes) => prefixes.iter().any(|p| path.starts_with(p.as_str())),
        }
    }
}

#[derive(Debug, Clone)]
pub enum RoleMatch {
    Any,
    OneOf(Vec<Role>),
    NoneOf(Vec<Role>),
}

impl RoleMatch {
    fn matches(&self, role: &Role) -> bool {
        match self {
            RoleMatch::Any => true,
            RoleMatch::OneOf(roles) => roles.contains(role),
            RoleMatch::NoneOf(roles) => !roles.contains(role),
        }
    }
}

/// Rule
///
/// One row of the policy table: when both the path and the role match, `then` is the answer.
#[derive(Debug, Clone)]
pub struct Rule {
    pub name: &'static str,
    pub path: PathMatch,
    pub role: RoleMatch,
    pub then: Decision,
}

impl Rule {
    fn applies(&self, role: &Role, path: &str) -> bool {
        self.path.matches(path) && self.role.matches(role)
    }
}

pub const LOGIN_PATH: &str = "/login";
pub const DEFAULT_PATH: &str = "/company/dashboard";
pub const SUPER_ADMIN_PREFIX: &str = "/super-admin";

/// Prefixes a plain `user` may open, in evaluation order.
pub const USER_ALLOW_LIST: &[&str] = &[
    "/company/dashboard",
    "/master-data/accounts",
    "/master-data/products",
    "/operations/bookings",
    "/operations/orders",
    "/operations/invoices",
    "/operations/accounts-receivables",
    "/forms",
];

/// AccessPolicy
///
/// The static route table. Built once at startup and shared read-only between requests.
/// The three fixed paths drive the steps that run before a role is known (login page,
/// missing or rejected credential); the rule list covers everything after verification.
#[derive(Debug, Clone)]
pub struct AccessPolicy {
    pub login_path: String,
    pub default_path: String,
    rules: Vec<Rule>,
}

impl AccessPolicy {
    pub fn new(login_path: &str, default_path: &str, rules: Vec<Rule>) -> Self {
        Self {
            login_path: login_path.to_string(),
            default_path: default_path.to_string(),
            rules,
        }
    }

    /// greazebook
    ///
    /// The production table:
    /// 1. `/super-admin` is closed to everyone but `superadmin`.
    /// 2. `/super-admin` is open to `superadmin`.
    /// 3. `admin` and `superadmin` may open anything else.
    /// 4. `user` may open the allow-listed prefixes.
    /// 5. `user` is sent back to the dashboard from anywhere else.
    ///
    /// A role outside the enumeration matches none of rules 3-5 and falls off the end
    /// of the table, which the gate turns into a login redirect.
    pub fn greazebook() -> Self {
        let super_admin = PathMatch::Prefixes(vec![SUPER_ADMIN_PREFIX.to_string()]);

        let rules = vec![
            Rule {
                name: "super-admin-only",
                path: super_admin.clone(),
                role: RoleMatch::NoneOf(vec![Role::SuperAdmin]),
                then: Decision::RedirectToDefault,
            },
            Rule {
                name: "super-admin",
                path: super_admin,
                role: RoleMatch::OneOf(vec![Role::SuperAdmin]),
                then: Decision::Allow,
            },
            Rule {
                name: "full-access",
                path: PathMatch::Any,
                role: RoleMatch::OneOf(vec![Role::Admin, Role::SuperAdmin]),
                then: Decision::Allow,
            },
            Rule {
                name: "user-allow-list",
                path: PathMatch::Prefixes(USER_ALLOW_LIST.iter().map(|p| p.to_string()).collect()),
                role: RoleMatch::OneOf(vec![Role::User]),
                then: Decision::Allow,
            },
            Rule {
                name: "user-outside-allow-list",
                path: PathMatch::Any,
                role: RoleMatch::OneOf(vec![Role::User]),
                then: Decision::RedirectToDefault,
            },
        ];

        Self::new(LOGIN_PATH, DEFAULT_PATH, rules)
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Top-down, first match wins. `None` means no rule matched.
    pub fn evaluate(&self, role: &Role, path: &str) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.applies(role, path))
    }

    pub fn is_login_path(&self, path: &str) -> bool {
        path.starts_with(self.login_path.as_str())
    }

    /// Where a redirect decision points. `None` for `Allow`.
    pub fn location(&self, decision: Decision) -> Option<&str> {
        match decision {
            Decision::Allow => None,
            Decision::RedirectToLogin => Some(&self.login_path),
            Decision::RedirectToDefault => Some(&self.default_path),
        }
    }
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self::greazebook()
    }
}
