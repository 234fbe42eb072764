use std::time::Duration;

/// What the escalation policy wants done after a warn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    None,
    Mute(Duration),
    Ban,
}

/// Threshold table, ascending. A count selects the highest tier whose
/// threshold it reaches; counts past the end stay on the last tier. New
/// tiers are added here, callers never change.
const TIERS: &[(u64, Directive)] = &[
    (2, Directive::Mute(Duration::from_secs(3600))),
    (3, Directive::Mute(Duration::from_secs(2 * 3600))),
    (4, Directive::Mute(Duration::from_secs(5 * 3600))),
    (5, Directive::Ban),
];

/// Maps an active-warn count to a directive. Stateless and deterministic.
pub fn directive_for(active_warns: u64) -> Directive {
    TIERS
        .iter()
        .rev()
        .find(|(threshold, _)| active_warns >= *threshold)
        .map(|(_, directive)| *directive)
        .unwrap_or(Directive::None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escalation_table() {
        assert_eq!(directive_for(0), Directive::None);
        assert_eq!(directive_for(1), Directive::None);
        assert_eq!(
            directive_for(2),
            Directive::Mute(Duration::from_secs(3600))
        );
        assert_eq!(
            directive_for(3),
            Directive::Mute(Duration::from_secs(7200))
        );
        assert_eq!(
            directive_for(4),
            Directive::Mute(Duration::from_secs(18000))
        );
        assert_eq!(directive_for(5), Directive::Ban);
    }

    #[test]
    fn counts_past_the_table_clamp_to_ban() {
        assert_eq!(directive_for(6), Directive::Ban);
        assert_eq!(directive_for(250), Directive::Ban);
    }
}
