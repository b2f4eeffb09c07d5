//! Role groups: which users count as bots, sysops, stewards and so on

use crate::graph::{CompressedGraph, VertexAttributes};

/// Boolean role flag stored on every user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Bot,
    Sysop,
    Bureaucrat,
    Steward,
    Founder,
    Anonymous,
    Blocked,
}

/// One term of a group predicate: the flag must equal `expected`.
///
/// `expected == false` reads "the flag is not set".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Condition {
    pub role: Role,
    pub expected: bool,
}

const fn is(role: Role) -> Condition {
    Condition { role, expected: true }
}

const fn not(role: Role) -> Condition {
    Condition { role, expected: false }
}

/// A named conjunction of conditions
#[derive(Debug, Clone, Copy)]
pub struct GroupDefinition {
    pub name: &'static str,
    pub conditions: &'static [Condition],
}

pub fn matches_all(conditions: &[Condition], vertex: &VertexAttributes) -> bool {
    conditions
        .iter()
        .all(|c| vertex.has_role(c.role) == c.expected)
}

use Role::*;

/// Every group the analysis knows, in report order
pub const GROUP_DEFINITIONS: &[GroupDefinition] = &[
    GroupDefinition { name: "all", conditions: &[] },
    GroupDefinition { name: "bot", conditions: &[is(Bot)] },
    GroupDefinition { name: "not_bot", conditions: &[not(Bot)] },
    GroupDefinition {
        name: "sysop",
        conditions: &[is(Sysop), not(Bureaucrat), not(Steward), not(Founder)],
    },
    GroupDefinition {
        name: "bureaucrat",
        conditions: &[is(Bureaucrat), not(Steward), not(Founder)],
    },
    GroupDefinition { name: "steward", conditions: &[is(Steward), not(Founder)] },
    GroupDefinition { name: "founder", conditions: &[is(Founder)] },
    GroupDefinition { name: "su", conditions: &[is(Sysop)] },
    GroupDefinition {
        name: "normal_user",
        conditions: &[
            not(Sysop),
            not(Bureaucrat),
            not(Steward),
            not(Founder),
            not(Bot),
            not(Anonymous),
        ],
    },
    GroupDefinition { name: "blocked", conditions: &[is(Blocked)] },
    GroupDefinition { name: "not_blocked", conditions: &[not(Blocked)] },
    GroupDefinition { name: "anonymous", conditions: &[is(Anonymous)] },
    GroupDefinition { name: "not_anonymous", conditions: &[not(Anonymous)] },
];

/// Users holding none of the privileged roles nor the bot flag
/// (anonymous users are included, unlike `normal_user`)
pub const UNPRIVILEGED: &[Condition] = &[
    not(Sysop),
    not(Bureaucrat),
    not(Steward),
    not(Founder),
    not(Bot),
];

/// Role priority used when a single role label is needed per user
pub const USER_ROLE_PRIORITY: &[(Role, &str)] = &[
    (Anonymous, "anonymous"),
    (Bot, "bot"),
    (Bureaucrat, "bureaucrat"),
    (Sysop, "sysop"),
];

/// Label for users holding none of `USER_ROLE_PRIORITY`
pub const DEFAULT_USER_ROLE: &str = "user";

/// First role of `USER_ROLE_PRIORITY` the user holds
pub fn user_role(vertex: &VertexAttributes) -> &'static str {
    USER_ROLE_PRIORITY
        .iter()
        .find(|(role, _)| vertex.has_role(*role))
        .map(|&(_, label)| label)
        .unwrap_or(DEFAULT_USER_ROLE)
}

pub fn definition(name: &str) -> Option<&'static GroupDefinition> {
    GROUP_DEFINITIONS.iter().find(|def| def.name == name)
}

/// Nodes of `graph` satisfying `conditions`, ascending
pub fn select(graph: &CompressedGraph, conditions: &[Condition]) -> Vec<u32> {
    graph
        .vertices
        .iter()
        .enumerate()
        .filter(|(_, vertex)| matches_all(conditions, vertex))
        .map(|(idx, _)| idx as u32)
        .collect()
}

/// Nodes per defined group, in definition order
#[derive(Debug, Clone, Default)]
pub struct Groups {
    classes: Vec<(&'static str, Vec<u32>)>,
}

impl Groups {
    /// Classify every node into every known group
    pub fn classify_all(graph: &CompressedGraph) -> Self {
        Self::classify(graph, GROUP_DEFINITIONS)
    }

    /// Only the `all` group
    pub fn all_only(graph: &CompressedGraph) -> Self {
        Self::classify(graph, &GROUP_DEFINITIONS[..1])
    }

    pub fn classify(graph: &CompressedGraph, definitions: &[GroupDefinition]) -> Self {
        let classes = definitions
            .iter()
            .map(|def| (def.name, select(graph, def.conditions)))
            .collect();
        Self { classes }
    }

    pub fn get(&self, name: &str) -> Option<&[u32]> {
        self.classes
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, members)| members.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &[u32])> {
        self.classes.iter().map(|(name, members)| (*name, members.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphBuilder;

    fn user(name: &str, set: impl Fn(&mut VertexAttributes)) -> VertexAttributes {
        let mut attrs = VertexAttributes::named(name);
        set(&mut attrs);
        attrs
    }

    fn sample_graph() -> CompressedGraph {
        let mut builder = GraphBuilder::with_capacity(8);
        builder.add_vertex(user("plain", |_| {}));
        builder.add_vertex(user("admin", |v| v.sysop = true));
        builder.add_vertex(user("crat", |v| {
            v.sysop = true;
            v.bureaucrat = true;
        }));
        builder.add_vertex(user("steward", |v| {
            v.sysop = true;
            v.steward = true;
        }));
        builder.add_vertex(user("jimbo", |v| {
            v.founder = true;
            v.sysop = true;
        }));
        builder.add_vertex(user("robot", |v| v.bot = true));
        builder.add_vertex(user("10.0.0.1", |v| {
            v.anonymous = true;
            v.blocked = true;
        }));
        builder.build().unwrap()
    }

    fn is_subset(small: &[u32], big: &[u32]) -> bool {
        small.iter().all(|x| big.contains(x))
    }

    #[test]
    fn exclusive_admin_ranks() {
        let groups = Groups::classify_all(&sample_graph());
        assert_eq!(groups.get("sysop"), Some(&[1][..]));
        assert_eq!(groups.get("bureaucrat"), Some(&[2][..]));
        assert_eq!(groups.get("steward"), Some(&[3][..]));
        assert_eq!(groups.get("founder"), Some(&[4][..]));
        assert_eq!(groups.get("su"), Some(&[1, 2, 3, 4][..]));
    }

    #[test]
    fn groups_are_consistent() {
        let graph = sample_graph();
        let groups = Groups::classify_all(&graph);
        let get = |name| groups.get(name).unwrap();

        assert_eq!(get("all").len(), graph.node_count);
        assert!(is_subset(get("sysop"), get("su")));
        assert!(is_subset(get("bureaucrat"), get("su")));
        assert!(is_subset(get("normal_user"), get("not_bot")));
        assert!(is_subset(get("normal_user"), get("not_anonymous")));
        assert_eq!(get("bot").len() + get("not_bot").len(), graph.node_count);
        assert_eq!(get("blocked").len() + get("not_blocked").len(), graph.node_count);
        assert_eq!(get("normal_user"), &[0]);
        assert_eq!(get("anonymous"), &[6]);
    }

    #[test]
    fn unprivileged_keeps_anonymous_users() {
        let graph = sample_graph();
        assert_eq!(select(&graph, UNPRIVILEGED), vec![0, 6]);
    }

    #[test]
    fn default_classification_is_all_only() {
        let groups = Groups::all_only(&sample_graph());
        assert_eq!(groups.iter().count(), 1);
        assert!(groups.get("sysop").is_none());
    }

    #[test]
    fn user_role_priority() {
        let graph = sample_graph();
        let roles: Vec<&str> = graph.vertices.iter().map(user_role).collect();
        assert_eq!(
            roles,
            vec!["user", "sysop", "bureaucrat", "sysop", "sysop", "bot", "anonymous"]
        );
    }
}
