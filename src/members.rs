use std::cmp::Ordering;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::Member;

static LEADERSHIP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)lead|director|head").unwrap());

pub fn is_leadership(member: &Member) -> bool {
    member
        .role
        .as_deref()
        .is_some_and(|role| LEADERSHIP_RE.is_match(role))
}

/// Members in display order: leadership roles first, then by name.
///
/// Derived on every call; the unit's own member list is never reordered.
pub fn sorted_members(members: &[Member]) -> Vec<&Member> {
    let mut sorted: Vec<&Member> = members.iter().collect();
    sorted.sort_by(|a, b| compare_members(a, b));
    sorted
}

fn compare_members(a: &Member, b: &Member) -> Ordering {
    match (is_leadership(a), is_leadership(b)) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => a
            .name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.name.cmp(&b.name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names<'a>(members: &[&'a Member]) -> Vec<&'a str> {
        members.iter().map(|member| member.name.as_str()).collect()
    }

    #[test]
    fn leadership_sorts_first() {
        let members = vec![
            Member::new("Bob", Some("Engineer")),
            Member::new("Amy", Some("Lead")),
        ];
        assert_eq!(names(&sorted_members(&members)), vec!["Amy", "Bob"]);

        let members = vec![
            Member::new("Aaron", Some("Volunteer")),
            Member::new("Zed", Some("Head of Design")),
            Member::new("Mia", Some("DIRECTOR")),
        ];
        assert_eq!(names(&sorted_members(&members)), vec!["Mia", "Zed", "Aaron"]);
    }

    #[test]
    fn alphabetical_without_roles() {
        let members = vec![Member::new("Zoe", None), Member::new("Amy", None)];
        assert_eq!(names(&sorted_members(&members)), vec!["Amy", "Zoe"]);

        let members = vec![Member::new("bea", None), Member::new("Al", None)];
        assert_eq!(names(&sorted_members(&members)), vec!["Al", "bea"]);
    }

    #[test]
    fn leaves_source_order_untouched() {
        let members = vec![Member::new("Zoe", None), Member::new("Amy", Some("Lead"))];
        let _ = sorted_members(&members);
        assert_eq!(members[0].name, "Zoe");
        assert!(is_leadership(&members[1]));
        assert!(!is_leadership(&members[0]));
    }
}
