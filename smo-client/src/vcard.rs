//! Reviewer vCard block (version 3.0, FN + optional N and ORG)

/// Build a reviewer vCard.
///
/// With a first name the formatted name is `"<firstname> <name>"` and a
/// structured `N:<name>;<firstname>` line is added.
pub fn reviewer_vcard(name: &str, firstname: Option<&str>, organisation: Option<&str>) -> String {
    let mut lines = vec!["BEGIN:VCARD".to_string(), "VERSION:3.0".to_string()];

    match firstname.filter(|f| !f.is_empty()) {
        Some(firstname) => {
            lines.push(format!("FN:{} {}", firstname, name));
            lines.push(format!("N:{};{}", name, firstname));
        }
        None => lines.push(format!("FN:{}", name)),
    }

    if let Some(org) = organisation.filter(|o| !o.is_empty()) {
        lines.push(format!("ORG:{}", org));
    }

    lines.push("END:VCARD".to_string());
    lines.join("\n")
}
