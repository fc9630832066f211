//! Simulates a platform adapter driving a `Dash` over a tiny in-memory document.

use std::collections::HashMap;

use dashup::{
    Dash, DashEvent, DashOptions, Dom, FilterError, LayoutEngine, MutationRecord, Size,
    Transition, UnloadMode,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct Node(usize);

#[derive(Default)]
struct NodeData {
    tag: String,
    children: Vec<usize>,
    attrs: HashMap<String, String>,
    classes: Vec<String>,
    markup: String,
    size: Size,
    fixed: Option<Size>,
    removed: bool,
}

/// The smallest document that satisfies the `Dom` seam.
#[derive(Default)]
struct MiniDom {
    nodes: Vec<NodeData>,
}

impl MiniDom {
    fn create(&mut self, tag: &str, markup: &str) -> Node {
        self.nodes.push(NodeData {
            tag: tag.into(),
            markup: markup.into(),
            size: Size::new(200, 150),
            ..NodeData::default()
        });
        Node(self.nodes.len() - 1)
    }

    fn append(&mut self, parent: Node, child: Node) {
        self.nodes[parent.0].children.push(child.0);
    }
}

impl Dom for MiniDom {
    type Elem = Node;

    fn contains(&self, elem: &Node) -> bool {
        elem.0 < self.nodes.len() && !self.nodes[elem.0].removed
    }

    fn children(&self, parent: &Node) -> Vec<Node> {
        self.nodes[parent.0].children.iter().map(|&c| Node(c)).collect()
    }

    fn remove(&mut self, elem: &Node) {
        self.nodes[elem.0].removed = true;
        let target = elem.0;
        for node in &mut self.nodes {
            node.children.retain(|&c| c != target);
        }
    }

    fn matches(&self, elem: &Node, selector: &str) -> Result<bool, FilterError> {
        Ok(selector == "*" || self.nodes[elem.0].tag == selector)
    }

    fn attribute(&self, elem: &Node, name: &str) -> Option<String> {
        self.nodes[elem.0].attrs.get(name).cloned()
    }

    fn set_attribute(&mut self, elem: &Node, name: &str, value: &str) {
        self.nodes[elem.0].attrs.insert(name.into(), value.into());
    }

    fn add_class(&mut self, elem: &Node, class: &str) {
        if !self.nodes[elem.0].classes.iter().any(|c| c == class) {
            self.nodes[elem.0].classes.push(class.into());
        }
    }

    fn remove_class(&mut self, elem: &Node, class: &str) {
        self.nodes[elem.0].classes.retain(|c| c != class);
    }

    fn content_size(&self, elem: &Node) -> Size {
        self.nodes[elem.0].size
    }

    fn set_fixed_size(&mut self, elem: &Node, size: Option<Size>) {
        self.nodes[elem.0].fixed = size;
    }

    fn inner_markup(&self, elem: &Node) -> String {
        self.nodes[elem.0]
            .children
            .iter()
            .map(|&c| self.nodes[c].markup.clone())
            .collect()
    }

    fn set_inner_markup(&mut self, elem: &Node, markup: &str) {
        self.nodes[elem.0].children.clear();
        if !markup.is_empty() {
            let parsed = self.create("parsed", markup);
            self.append(*elem, parsed);
        }
    }

    fn take_children(&mut self, elem: &Node) -> Vec<Node> {
        std::mem::take(&mut self.nodes[elem.0].children)
            .into_iter()
            .map(Node)
            .collect()
    }

    fn append_children(&mut self, elem: &Node, children: Vec<Node>) {
        for child in children {
            self.append(*elem, child);
        }
    }
}

/// Stand-in for a real masonry engine: just logs what it is asked to do.
struct LoggingLayout;

impl LayoutEngine<Node> for LoggingLayout {
    fn add_items(&mut self, items: &[Node]) {
        println!("[layout] add_items {items:?}");
    }

    fn layout(&mut self, items: Option<&[Node]>) {
        println!("[layout] layout {items:?}");
    }

    fn destroy(&mut self) {
        println!("[layout] destroy");
    }
}

fn main() {
    let mut dom = MiniDom::default();
    let container = dom.create("main", "");
    for n in 0..3 {
        let card = dom.create("card", "");
        let body = dom.create("p", &format!("<p>card {n}</p>"));
        dom.append(card, body);
        dom.append(container, card);
    }

    let options = DashOptions::new(container)
        .with_item_selector(Some("card"))
        .with_unload_mode(UnloadMode::Markup)
        .with_listener(DashEvent::ItemVisible, |items: &[Node]| {
            println!("[event] visible {items:?}");
        })
        .with_listener(DashEvent::ItemHidden, |items: &[Node]| {
            println!("[event] hidden {items:?}");
        })
        .with_listener(DashEvent::BatchProcessed, |items: &[Node]| {
            println!("[event] batch processed {items:?}");
        });

    let mut dash = Dash::new(&mut dom, options, |_, config| {
        println!("[layout] constructed with {config:?}");
        LoggingLayout
    })
    .expect("setup");

    // The adapter's image tracker reports the initial batch as loaded.
    let initial_items = dom.children(&container);
    dash.notify_images_loaded(&mut dom, 0, &initial_items);

    // A new card shows up in the document.
    let card = dom.create("card", "");
    let body = dom.create("p", "<p>late card</p>");
    dom.append(card, body);
    dom.append(container, card);
    let batch = dash
        .notify_mutations(&mut dom, &[MutationRecord::child_list(container, vec![card])])
        .expect("mutation cycle");
    if let Some(id) = batch {
        dash.notify_images_loaded(&mut dom, id, &[card]);
    }

    // The user scrolls the first card out of view and back in.
    let first = initial_items[0];
    dash.notify_visibility(&mut dom, &first, Transition::Exit);
    println!(
        "while hidden: inner_markup = {:?}, pinned = {:?}",
        dom.inner_markup(&first),
        dom.nodes[first.0].fixed
    );
    dash.notify_visibility(&mut dom, &first, Transition::Enter);
    println!("after reload: inner_markup = {:?}", dom.inner_markup(&first));

    dash.destroy();
}
