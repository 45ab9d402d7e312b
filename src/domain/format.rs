//! Key/value rendering of ACL records
//!
//! Records are first turned into `label|value` lines, then aligned into
//! two columns by [`format_kv`].

use crate::domain::{AclPolicy, AclToken};

/// Policies value shown for tokens whose type ignores policies.
pub const POLICIES_NOT_APPLICABLE: &str = "n/a";

/// Separator between label and value columns.
pub const KV_GLUE: &str = " = ";

/// Placeholder for an empty value cell.
pub const EMPTY_CELL: &str = "<none>";

/// Build the `label|value` lines for a token.
///
/// Field order is fixed: Accessor ID, Secret ID, Name, Type, Global, Policies,
/// Create Time, Create Index, Modify Index.
pub fn format_token(token: &AclToken) -> Vec<String> {
    let mut lines = vec![
        format!("Accessor ID|{}", token.accessor_id),
        format!("Secret ID|{}", token.secret_id),
        format!("Name|{}", token.name),
        format!("Type|{}", token.token_type),
        format!("Global|{}", token.global),
    ];

    if token.token_type.applies_policies() {
        lines.push(format!("Policies|{}", bracket_list(&token.policies)));
    } else {
        lines.push(format!("Policies|{POLICIES_NOT_APPLICABLE}"));
    }

    lines.extend([
        format!("Create Time|{}", token.create_time),
        format!("Create Index|{}", token.create_index),
        format!("Modify Index|{}", token.modify_index),
    ]);
    lines
}

/// Build the `label|value` lines for a policy.
pub fn format_policy(policy: &AclPolicy) -> Vec<String> {
    vec![
        format!("Name|{}", policy.name),
        format!("Description|{}", policy.description),
        format!("Rules|{}", policy.rules),
        format!("CreateIndex|{}", policy.create_index),
        format!("ModifyIndex|{}", policy.modify_index),
    ]
}

/// Render a list as `[a b c]`, preserving order.
pub fn bracket_list<S: AsRef<str>>(items: &[S]) -> String {
    let joined = items
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(" ");
    format!("[{joined}]")
}

/// Align `label|value` lines into two columns joined by [`KV_GLUE`].
///
/// Only the first `|` separates label from value. A line without a
/// separator is treated as a label with an empty value.
pub fn format_kv<S: AsRef<str>>(lines: &[S]) -> String {
    let rows: Vec<(&str, &str)> = lines
        .iter()
        .map(|line| {
            let line = line.as_ref();
            match line.split_once('|') {
                Some((label, value)) => (label.trim(), value.trim()),
                None => (line.trim(), ""),
            }
        })
        .collect();

    let width = rows
        .iter()
        .map(|(label, _)| label.chars().count())
        .max()
        .unwrap_or(0);

    rows.iter()
        .map(|&(label, value)| {
            let value = if value.is_empty() { EMPTY_CELL } else { value };
            format!("{label:<width$}{KV_GLUE}{value}")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TokenType;
    use chrono::{TimeZone, Utc};

    fn bootstrap_token() -> AclToken {
        AclToken {
            accessor_id: "abc123".into(),
            secret_id: "xyz789".into(),
            name: String::new(),
            token_type: TokenType::Management,
            global: true,
            policies: vec![],
            create_time: Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap(),
            create_index: 5,
            modify_index: 5,
        }
    }

    #[test]
    fn given_management_token_when_formatting_then_emits_fixed_order() {
        let lines = format_token(&bootstrap_token());

        assert_eq!(
            lines,
            vec![
                "Accessor ID|abc123",
                "Secret ID|xyz789",
                "Name|",
                "Type|management",
                "Global|true",
                "Policies|n/a",
                "Create Time|2023-01-01 00:00:00 UTC",
                "Create Index|5",
                "Modify Index|5",
            ]
        );
    }

    #[test]
    fn given_management_token_with_policies_when_formatting_then_suppresses_them() {
        let mut token = bootstrap_token();
        token.policies = vec!["ops".into(), "dev".into()];

        let lines = format_token(&token);

        assert_eq!(lines[5], "Policies|n/a");
    }

    #[test]
    fn given_client_token_when_formatting_then_lists_policies_in_order() {
        let mut token = bootstrap_token();
        token.token_type = TokenType::Client;
        token.policies = vec!["readonly".into(), "deploy".into(), "audit".into()];

        let lines = format_token(&token);

        assert_eq!(lines[5], "Policies|[readonly deploy audit]");
    }

    #[test]
    fn given_client_token_without_policies_when_formatting_then_shows_empty_list() {
        let mut token = bootstrap_token();
        token.token_type = TokenType::Client;

        assert_eq!(format_token(&token)[5], "Policies|[]");
    }

    #[test]
    fn given_policy_when_formatting_then_emits_fixed_order() {
        let policy = AclPolicy {
            name: "readonly".into(),
            description: String::new(),
            rules: r#"namespace "default" { policy = "read" }"#.into(),
            create_index: 10,
            modify_index: 12,
        };

        assert_eq!(
            format_policy(&policy),
            vec![
                "Name|readonly",
                "Description|",
                r#"Rules|namespace "default" { policy = "read" }"#,
                "CreateIndex|10",
                "ModifyIndex|12",
            ]
        );
    }

    #[test]
    fn given_lines_when_formatting_kv_then_aligns_labels() {
        let out = format_kv(&["Name|x", "Accessor ID|abc", "Empty|"]);

        assert_eq!(
            out,
            "Name        = x\nAccessor ID = abc\nEmpty       = <none>"
        );
    }

    #[test]
    fn given_value_with_pipe_when_formatting_kv_then_keeps_value_intact() {
        assert_eq!(format_kv(&["Rules|a|b"]), "Rules = a|b");
    }

    #[test]
    fn given_same_token_when_rendering_twice_then_output_is_identical() {
        let token = bootstrap_token();
        assert_eq!(
            format_kv(&format_token(&token)),
            format_kv(&format_token(&token))
        );
    }
}
