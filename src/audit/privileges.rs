//! Static privilege groups.

/// Privileges that administer the server rather than its data.
pub const ADMIN: [&str; 7] = [
    "SUPER",
    "SHUTDOWN",
    "RELOAD",
    "PROCESS",
    "CREATE USER",
    "REPLICATION CLIENT",
    "REPLICATION SLAVE",
];

/// Privileges that change schema objects.
pub const EXTREME_DML: [&str; 9] = [
    "CREATE",
    "DROP",
    "EVENT",
    "ALTER",
    "INDEX",
    "TRIGGER",
    "CREATE VIEW",
    "ALTER ROUTINE",
    "CREATE ROUTINE",
];

/// Privileges that change rows.
pub const DML: [&str; 4] = ["DELETE", "INSERT", "UPDATE", "CREATE TEMPORARY TABLES"];

/// Classification of a privilege name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrivilegeGroup {
    Admin,
    ExtremeDml,
    Dml,
}

impl PrivilegeGroup {
    /// Privilege names in this group.
    #[must_use]
    pub fn privileges(&self) -> &'static [&'static str] {
        match self {
            Self::Admin => &ADMIN,
            Self::ExtremeDml => &EXTREME_DML,
            Self::Dml => &DML,
        }
    }

    /// Find the group a privilege belongs to, ignoring case and padding.
    #[must_use]
    pub fn classify(privilege: &str) -> Option<Self> {
        let privilege = privilege.trim();
        [Self::Admin, Self::ExtremeDml, Self::Dml]
            .into_iter()
            .find(|group| {
                group
                    .privileges()
                    .iter()
                    .any(|p| p.eq_ignore_ascii_case(privilege))
            })
    }
}

/// Render names as a SQL `IN` list: `('A', 'B')`.
#[must_use]
pub fn in_list(items: &[&str]) -> String {
    let quoted: Vec<String> = items.iter().map(|item| format!("'{item}'")).collect();
    format!("({})", quoted.join(", "))
}
