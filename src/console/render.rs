//! Text views over a snapshot.
//!
//! Every function takes the snapshot it renders by reference; callers load
//! it once per view.

use chrono::{DateTime, Local};

use crate::console::command::COMMANDS;
use crate::snapshot::Snapshot;
use crate::upstream::{PoolMember, VirtualServer};

const UP_ICON: &str = "✓";
const DOWN_ICON: &str = "✗";

fn icon(ok: bool) -> &'static str {
    if ok {
        UP_ICON
    } else {
        DOWN_ICON
    }
}

fn timestamp(at: DateTime<Local>) -> String {
    at.format("%Y-%m-%d %H:%M:%S").to_string()
}

pub fn help() -> String {
    let width = COMMANDS.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
    let mut out = String::from("\nAvailable commands:\n");
    for (name, about) in COMMANDS {
        out.push_str(&format!("  {:<width$} - {}\n", name, about, width = width));
    }
    out
}

/// Host, snapshot freshness and member totals. There is no connection line:
/// the session is authenticated once and holds no live connection state.
pub fn status(host: &str, snapshot: &Snapshot) -> String {
    let mut out = format!("\nStatus for {}:\n", host);
    match snapshot.captured_at {
        Some(at) => out.push_str(&format!("Last updated: {}\n", timestamp(at))),
        None => out.push_str("Last updated: waiting for first poll\n"),
    }
    if !snapshot.members.is_empty() {
        out.push_str(&format!(
            "Pool members: {} total, {} up, {} down\n",
            snapshot.members.len(),
            snapshot.count_up(),
            snapshot.count_down()
        ));
    }
    out
}

/// Members grouped by pool, pools in first-seen order.
fn group_by_pool(members: &[PoolMember]) -> Vec<(&str, Vec<&PoolMember>)> {
    let mut groups: Vec<(&str, Vec<&PoolMember>)> = Vec::new();
    for member in members {
        match groups.iter_mut().find(|(pool, _)| *pool == member.pool) {
            Some((_, list)) => list.push(member),
            None => groups.push((member.pool.as_str(), vec![member])),
        }
    }
    groups
}

pub fn pools(snapshot: &Snapshot) -> String {
    if snapshot.members.is_empty() {
        return "No pool data available.\n".to_string();
    }

    let mut out = String::from("\nPool Status:\n");
    for (pool, members) in group_by_pool(&snapshot.members) {
        let up = members.iter().filter(|m| m.state.is_up()).count();
        out.push_str(&format!("  {}: {}/{} members up\n", pool, up, members.len()));
        for m in members {
            out.push_str(&format!(
                "    {} {} ({}) - {}\n",
                icon(m.state.is_up()),
                m.name,
                m.address,
                m.state
            ));
        }
    }
    out
}

pub fn pool_details(snapshot: &Snapshot, pool: &str) -> String {
    let members: Vec<&PoolMember> = snapshot.members_in(pool).collect();
    if members.is_empty() {
        return format!("Pool '{}' not found.\n", pool);
    }

    let mut out = format!("\nPool '{}' Details:\n", pool);
    for m in members {
        out.push_str(&format!("  Member: {}\n", m.name));
        out.push_str(&format!("    Address: {}\n", m.address));
        out.push_str(&format!("    State: {}\n", m.state));
        out.push_str(&format!("    Session: {}\n", m.session));
        out.push_str(&format!("    Connection Limit: {}\n\n", m.connection_limit));
    }
    out
}

pub fn virtual_servers(servers: &[VirtualServer]) -> String {
    if servers.is_empty() {
        return "No virtual servers found.\n".to_string();
    }

    let mut out = String::from("\nVirtual Servers:\n");
    for vs in servers {
        out.push_str(&format!("  {} {}\n", icon(vs.enabled), vs.name));
        out.push_str(&format!("    Destination: {}\n", vs.destination));
        out.push_str(&format!("    Pool: {}\n", vs.pool));
        out.push_str(&format!("    Enabled: {}\n\n", vs.enabled));
    }
    out
}

pub fn logs(snapshot: &Snapshot) -> String {
    if snapshot.logs.is_empty() {
        return "No log data available.\n".to_string();
    }
    format!("\nRecent System Logs:\nFound {} log entries\n", snapshot.logs.len())
}

/// Member health figures behind the `summary` view.
#[derive(Debug, Clone, PartialEq)]
pub struct HealthSummary<'a> {
    pub total: usize,
    pub up: usize,
    pub down: Vec<&'a PoolMember>,
    /// Percentage of members up; 0.0 with no members.
    pub health_percent: f64,
}

impl<'a> HealthSummary<'a> {
    pub fn from_snapshot(snapshot: &'a Snapshot) -> Self {
        let total = snapshot.members.len();
        let up = snapshot.count_up();
        let health_percent = if total > 0 {
            up as f64 / total as f64 * 100.0
        } else {
            0.0
        };
        Self {
            total,
            up,
            down: snapshot.members.iter().filter(|m| m.state.is_down()).collect(),
            health_percent,
        }
    }
}

/// `virtuals` is `None` when the on-demand fetch failed.
pub fn summary(
    host: &str,
    snapshot: &Snapshot,
    virtuals: Option<&[VirtualServer]>,
    now: DateTime<Local>,
) -> String {
    let mut out = format!("\nHealth Summary for {}:\n", host);

    if !snapshot.members.is_empty() {
        let health = HealthSummary::from_snapshot(snapshot);
        out.push_str(&format!("Overall Health: {:.1}%\n", health.health_percent));
        out.push_str(&format!("Pool Members: {}/{} operational\n", health.up, health.total));

        if !health.down.is_empty() {
            out.push_str("\nMembers DOWN:\n");
            for m in &health.down {
                out.push_str(&format!("  {} {}/{} ({})\n", DOWN_ICON, m.pool, m.name, m.address));
            }
        }
    }

    if let Some(servers) = virtuals.filter(|s| !s.is_empty()) {
        let enabled = servers.iter().filter(|v| v.enabled).count();
        out.push_str(&format!("Virtual Servers: {}/{} enabled\n", enabled, servers.len()));
    }

    out.push_str(&format!("Last Check: {}\n", timestamp(now)));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upstream::{LogEntry, MemberState};
    use serde_json::json;

    fn member(pool: &str, name: &str, state: &str) -> PoolMember {
        PoolMember {
            pool: pool.into(),
            name: name.into(),
            address: format!("10.0.0.{}", name.len()),
            state: MemberState::from(state),
            session: "monitor-enabled".into(),
            connection_limit: 100,
        }
    }

    fn eight_members() -> Snapshot {
        let mut members = Vec::new();
        for i in 0..6 {
            members.push(member("web", &format!("up{}", i), "up"));
        }
        members.push(member("web", "bad1", "down"));
        members.push(member("api", "bad2", "down"));
        Snapshot::new(members, vec![], Local::now())
    }

    #[test]
    fn test_health_summary_figures() {
        let snap = eight_members();
        let health = HealthSummary::from_snapshot(&snap);
        assert_eq!(health.total, 8);
        assert_eq!(health.up, 6);
        assert_eq!(health.health_percent, 75.0);
        let down: Vec<String> = health.down.iter().map(|m| m.key().to_string()).collect();
        assert_eq!(down, vec!["web/bad1", "api/bad2"]);
    }

    #[test]
    fn test_summary_view_lists_down_members() {
        let snap = eight_members();
        let text = summary("lb1", &snap, None, Local::now());
        assert!(text.contains("Overall Health: 75.0%"));
        assert!(text.contains("Pool Members: 6/8 operational"));
        assert!(text.contains("✗ web/bad1 (10.0.0.4)"));
        assert!(text.contains("✗ api/bad2 (10.0.0.4)"));
        assert_eq!(text.matches(DOWN_ICON).count(), 2);
        assert!(!text.contains("Virtual Servers"));
    }

    #[test]
    fn test_summary_counts_enabled_virtuals() {
        let servers = vec![
            VirtualServer::from_record(&json!({ "name": "a", "enabled": true })),
            VirtualServer::from_record(&json!({ "name": "b" })),
        ];
        let text = summary("lb1", &Snapshot::empty(), Some(&servers), Local::now());
        assert!(text.contains("Virtual Servers: 1/2 enabled"));
        assert!(!text.contains("Overall Health"));
    }

    #[test]
    fn test_empty_health_is_zero() {
        let snap = Snapshot::empty();
        assert_eq!(HealthSummary::from_snapshot(&snap).health_percent, 0.0);
    }

    #[test]
    fn test_pool_details_not_found_on_empty_snapshot() {
        assert_eq!(pool_details(&Snapshot::empty(), "poolA"), "Pool 'poolA' not found.\n");
    }

    #[test]
    fn test_pool_details_fields() {
        let snap = Snapshot::new(vec![member("poolA", "m1", "up")], vec![], Local::now());
        let text = pool_details(&snap, "poolA");
        assert!(text.contains("Member: m1"));
        assert!(text.contains("Session: monitor-enabled"));
        assert!(text.contains("Connection Limit: 100"));
    }

    #[test]
    fn test_pools_groups_in_first_seen_order() {
        let snap = Snapshot::new(
            vec![member("zeta", "a", "up"), member("alpha", "b", "down"), member("zeta", "c", "down")],
            vec![],
            Local::now(),
        );
        let text = pools(&snap);
        let zeta = text.find("zeta: 1/2 members up").unwrap();
        let alpha = text.find("alpha: 0/1 members up").unwrap();
        assert!(zeta < alpha);
        assert!(text.contains("✗ b (10.0.0.1) - down"));
    }

    #[test]
    fn test_empty_views() {
        let snap = Snapshot::empty();
        assert_eq!(pools(&snap), "No pool data available.\n");
        assert_eq!(logs(&snap), "No log data available.\n");
        assert_eq!(virtual_servers(&[]), "No virtual servers found.\n");
        assert!(status("lb1", &snap).contains("waiting for first poll"));
    }

    #[test]
    fn test_status_reports_totals_without_connection_line() {
        let text = status("lb1", &eight_members());
        assert!(text.contains("Status for lb1:"));
        assert!(text.contains("Last updated: "));
        assert!(text.contains("Pool members: 8 total, 6 up, 2 down"));
        assert!(!text.contains("Connected"));
    }

    #[test]
    fn test_logs_counts_entries() {
        let snap = Snapshot::new(vec![], vec![LogEntry(json!({})), LogEntry(json!({}))], Local::now());
        assert!(logs(&snap).contains("Found 2 log entries"));
    }

    #[test]
    fn test_help_lists_commands() {
        let text = help();
        for (name, _) in COMMANDS {
            assert!(text.contains(name));
        }
    }
}
