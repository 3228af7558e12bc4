//! SQL builders for Postgres row level security

/// Command a policy applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RlsCommand {
    Select,
    Insert,
    Update,
    Delete,
    All,
}

impl RlsCommand {
    fn as_sql(&self) -> &'static str {
        match self {
            RlsCommand::Select => "SELECT",
            RlsCommand::Insert => "INSERT",
            RlsCommand::Update => "UPDATE",
            RlsCommand::Delete => "DELETE",
            RlsCommand::All => "ALL",
        }
    }
}

/// Role a policy grants access to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RlsRole {
    Public,
    Authenticated,
    Anon,
    Custom(String),
}

impl RlsRole {
    fn as_sql(&self) -> &str {
        match self {
            RlsRole::Public => "public",
            RlsRole::Authenticated => "authenticated",
            RlsRole::Anon => "anon",
            RlsRole::Custom(name) => name,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RlsPolicy {
    pub name: String,
    pub table: String,
    pub command: RlsCommand,
    pub role: RlsRole,
    /// Row filter for existing rows; Postgres rejects it on INSERT policies
    pub using: Option<String>,
    /// Row filter for new rows; Postgres rejects it on SELECT/DELETE policies
    pub check: Option<String>,
    pub schema: Option<String>,
}

impl RlsPolicy {
    /// Open policy letting `role` run `command` on every row of `table`
    pub fn allow_all(name: &str, table: &str, command: RlsCommand, role: RlsRole) -> Self {
        let using = match command {
            RlsCommand::Insert => None,
            _ => Some("true".to_string()),
        };
        let check = match command {
            RlsCommand::Insert | RlsCommand::Update | RlsCommand::All => Some("true".to_string()),
            RlsCommand::Select | RlsCommand::Delete => None,
        };

        Self {
            name: name.to_string(),
            table: table.to_string(),
            command,
            role,
            using,
            check,
            schema: Some("public".to_string()),
        }
    }

    pub fn create_policy_sql(&self) -> String {
        let using_clause = match &self.using {
            Some(expr) => format!(" USING ({})", expr),
            None => String::new(),
        };
        let check_clause = match &self.check {
            Some(expr) => format!(" WITH CHECK ({})", expr),
            None => String::new(),
        };

        format!(
            "CREATE POLICY \"{}\" ON {} FOR {} TO {}{}{};",
            self.name,
            qualified(&self.table, self.schema.as_deref()),
            self.command.as_sql(),
            self.role.as_sql(),
            using_clause,
            check_clause
        )
    }

    pub fn drop_policy_sql(&self) -> String {
        format!(
            "DROP POLICY IF EXISTS \"{}\" ON {};",
            self.name,
            qualified(&self.table, self.schema.as_deref())
        )
    }
}

pub fn enable_rls_sql(table: &str, schema: Option<&str>) -> String {
    format!(
        "ALTER TABLE {} ENABLE ROW LEVEL SECURITY;",
        qualified(table, schema)
    )
}

pub fn disable_rls_sql(table: &str, schema: Option<&str>) -> String {
    format!(
        "ALTER TABLE {} DISABLE ROW LEVEL SECURITY;",
        qualified(table, schema)
    )
}

fn qualified(table: &str, schema: Option<&str>) -> String {
    match schema {
        Some(schema) => format!("{}.{}", schema, table),
        None => table.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_policy_has_only_check_clause() {
        let policy = RlsPolicy::allow_all(
            "anon insert",
            "appointment",
            RlsCommand::Insert,
            RlsRole::Anon,
        );
        assert_eq!(
            policy.create_policy_sql(),
            concat!(
                "CREATE POLICY \"anon insert\" ON public.appointment ",
                "FOR INSERT TO anon WITH CHECK (true);"
            )
        );
    }

    #[test]
    fn update_policy_has_both_clauses() {
        let policy = RlsPolicy::allow_all(
            "anon update",
            "appointment",
            RlsCommand::Update,
            RlsRole::Anon,
        );
        assert_eq!(
            policy.create_policy_sql(),
            concat!(
                "CREATE POLICY \"anon update\" ON public.appointment ",
                "FOR UPDATE TO anon USING (true) WITH CHECK (true);"
            )
        );
    }

    #[test]
    fn drop_and_toggle_sql() {
        let policy = RlsPolicy::allow_all(
            "anon delete",
            "appointment",
            RlsCommand::Delete,
            RlsRole::Anon,
        );
        assert_eq!(
            policy.drop_policy_sql(),
            "DROP POLICY IF EXISTS \"anon delete\" ON public.appointment;"
        );
        assert_eq!(
            enable_rls_sql("appointment", None),
            "ALTER TABLE appointment ENABLE ROW LEVEL SECURITY;"
        );
        assert_eq!(
            disable_rls_sql("appointment", Some("public")),
            "ALTER TABLE public.appointment DISABLE ROW LEVEL SECURITY;"
        );
    }
}
