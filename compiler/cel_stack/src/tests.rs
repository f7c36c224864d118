use super::*;

#[allow(dead_code)]
enum Node {
    Leaf(u64),
    Wrap(Box<Node>),
}

fn depth(node: &Node) -> u64 {
    ensure_sufficient_stack(|| match node {
        Node::Leaf(_) => 0,
        Node::Wrap(inner) => depth(inner) + 1,
    })
}

fn nested(levels: u64) -> Node {
    let mut node = Node::Leaf(levels);
    for _ in 0..levels {
        node = Node::Wrap(Box::new(node));
    }
    node
}

#[test]
fn shallow_tree() {
    assert_eq!(depth(&nested(3)), 3);
}

#[test]
fn deep_tree_does_not_overflow() {
    let tree = nested(200_000);
    assert_eq!(depth(&tree), 200_000);
    // Dropping a deeply nested Box chain recurses too.
    ensure_sufficient_stack(|| drop_iteratively(tree));
}

fn drop_iteratively(mut node: Node) {
    while let Node::Wrap(inner) = node {
        node = *inner;
    }
}

#[test]
fn returns_closure_result() {
    assert_eq!(ensure_sufficient_stack(|| "done"), "done");
}
