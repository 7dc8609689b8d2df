use std::fmt;

use crate::body::Body;

/// Largest number of direct children a body can hold.
pub const MAX_BODY_CHILDREN: usize = 10;

/// Stable handle to a body stored in a [`SceneGraph`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct BodyId(usize);

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Arena of bodies linked into orbit trees.
///
/// Bodies are inserted once and never removed, so handles stay valid for the
/// life of the graph. Each body has at most one parent and at most
/// [`MAX_BODY_CHILDREN`] children, kept in insertion order.
#[derive(Debug, Default)]
pub struct SceneGraph {
    bodies: Vec<Body>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `body` as a detached node and returns its handle.
    pub fn insert(&mut self, body: Body) -> BodyId {
        let id = BodyId(self.bodies.len());
        self.bodies.push(body);
        id
    }

    /// Appends `child` to `parent`'s children.
    ///
    /// A full parent, a self link, an already parented child or an unknown
    /// handle is logged and ignored; the graph is left unchanged.
    pub fn add_child(&mut self, parent: BodyId, child: BodyId) {
        let (Some(p), Some(c)) = (self.bodies.get(parent.0), self.bodies.get(child.0)) else {
            log::error!("cannot link {child} under {parent}: unknown body");
            return;
        };

        if parent == child {
            log::error!("body {:?} cannot orbit itself", p.label());
            return;
        }
        if let Some(existing) = c.parent {
            log::error!(
                "body {:?} already orbits {:?}",
                c.label(),
                self.bodies[existing.0].label()
            );
            return;
        }
        if p.children.len() >= MAX_BODY_CHILDREN {
            log::error!("body {:?} has too many children", p.label());
            return;
        }

        self.bodies[parent.0].children.push(child);
        self.bodies[child.0].parent = Some(parent);
    }

    pub fn get(&self, id: BodyId) -> Option<&Body> {
        self.bodies.get(id.0)
    }

    pub fn get_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.bodies.get_mut(id.0)
    }

    /// Children of `id` in insertion order; empty for unknown handles.
    pub fn children(&self, id: BodyId) -> &[BodyId] {
        self.get(id).map_or(&[], |b| b.children.as_slice())
    }

    pub fn children_count(&self, id: BodyId) -> usize {
        self.children(id).len()
    }

    pub fn parent(&self, id: BodyId) -> Option<BodyId> {
        self.get(id).and_then(|b| b.parent)
    }

    /// First body carrying `label`.
    pub fn find(&self, label: &str) -> Option<BodyId> {
        self.bodies.iter().position(|b| b.label() == label).map(BodyId)
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// All bodies in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (BodyId, &Body)> {
        self.bodies.iter().enumerate().map(|(i, b)| (BodyId(i), b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orrery_engine::assets::Model;
    use std::cell::RefCell;

    thread_local! {
        static ERRORS: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
    }

    /// Collects `error!` records per test thread.
    struct ErrorLog;

    impl log::Log for ErrorLog {
        fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
            metadata.level() == log::Level::Error
        }

        fn log(&self, record: &log::Record<'_>) {
            if self.enabled(record.metadata()) {
                ERRORS.with(|e| e.borrow_mut().push(record.args().to_string()));
            }
        }

        fn flush(&self) {}
    }

    static ERROR_LOG: ErrorLog = ErrorLog;

    fn errors_during(f: impl FnOnce()) -> Vec<String> {
        let _ = log::set_logger(&ERROR_LOG);
        log::set_max_level(log::LevelFilter::Trace);
        ERRORS.with(|e| e.borrow_mut().clear());
        f();
        ERRORS.with(|e| e.take())
    }

    fn body(label: &str) -> Body {
        Body::new(label, 1.0, 1.0, 10.0, Model::sphere())
    }

    fn graph_with_root() -> (SceneGraph, BodyId) {
        let mut g = SceneGraph::new();
        let root = g.insert(body("sun"));
        (g, root)
    }

    #[test]
    fn add_child_appends_at_end() {
        let (mut g, root) = graph_with_root();
        let a = g.insert(body("a"));
        let b = g.insert(body("b"));

        g.add_child(root, a);
        assert_eq!(g.children_count(root), 1);
        g.add_child(root, b);
        assert_eq!(g.children_count(root), 2);
        assert_eq!(g.children(root), &[a, b]);
        assert_eq!(g.parent(b), Some(root));
    }

    #[test]
    fn eleventh_child_is_rejected() {
        let (mut g, root) = graph_with_root();
        let kids: Vec<_> = (0..MAX_BODY_CHILDREN)
            .map(|i| g.insert(body(&format!("p{i}"))))
            .collect();
        let errors = errors_during(|| {
            for &k in &kids {
                g.add_child(root, k);
            }
        });
        assert!(errors.is_empty());
        let extra = g.insert(body("extra"));

        let errors = errors_during(|| g.add_child(root, extra));

        assert_eq!(errors, [r#"body "sun" has too many children"#]);
        assert_eq!(g.children_count(root), MAX_BODY_CHILDREN);
        assert_eq!(g.children(root), kids.as_slice());
        assert_eq!(g.parent(extra), None);
    }

    #[test]
    fn self_link_and_reparent_are_rejected() {
        let (mut g, root) = graph_with_root();
        let earth = g.insert(body("earth"));
        let mars = g.insert(body("mars"));

        let errors = errors_during(|| g.add_child(root, root));
        assert_eq!(errors, [r#"body "sun" cannot orbit itself"#]);
        assert_eq!(g.children_count(root), 0);

        g.add_child(root, earth);
        g.add_child(mars, earth);
        assert_eq!(g.children_count(mars), 0);
        assert_eq!(g.parent(earth), Some(root));

        g.add_child(root, earth);
        assert_eq!(g.children_count(root), 1);
    }

    #[test]
    fn unknown_handles_are_ignored() {
        let (mut g, root) = graph_with_root();
        let mut other = SceneGraph::new();
        other.insert(body("x"));
        let foreign = other.insert(body("y"));

        g.add_child(root, foreign);
        g.add_child(foreign, root);
        assert_eq!(g.children_count(root), 0);
        assert!(g.children(foreign).is_empty());
        assert!(g.get(foreign).is_none());
    }

    #[test]
    fn find_and_iter_follow_insertion_order() {
        let (mut g, root) = graph_with_root();
        let moon = g.insert(body("moon"));
        assert_eq!(g.find("sun"), Some(root));
        assert_eq!(g.find("moon"), Some(moon));
        assert_eq!(g.find("pluto"), None);
        let labels: Vec<_> = g.iter().map(|(_, b)| b.label().to_string()).collect();
        assert_eq!(labels, ["sun", "moon"]);
        assert_eq!(g.len(), 2);
        assert!(!g.is_empty());
    }
}
