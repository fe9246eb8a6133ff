use rb_tree_map::RbTree;
use tracing::Level;

fn print_values<'a>(title: &str, values: impl Iterator<Item = &'a &'static str>) {
    println!("{title}:");
    for v in values {
        println!("  {v}");
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(Level::TRACE)
        .init();

    let mut tree = RbTree::new();
    let entries = [
        (50, "Hello"),
        (30, "World"),
        (20, "I"),
        (40, "am"),
        (70, "a"),
        (60, "complex"),
        (80, "Red-Black"),
        (35, "Tree"),
    ];
    for (k, v) in entries {
        tree.insert(k, v);
    }

    print_values("Inorder Traversal", tree.traverse_in_order());
    print_values("Preorder Traversal", tree.traverse_pre_order());
    print_values("Postorder Traversal", tree.traverse_post_order());

    println!("Find 40: {:?}", tree.find(&40));
    assert_eq!(tree.find(&40), Some(&"am"));

    tree.delete(&40);
    print_values("Inorder Traversal after Deletion", tree.traverse_in_order());
    assert_eq!(tree.find(&40), None);

    match tree.validate() {
        Ok(stats) => println!("{stats:?}"),
        Err(err) => eprintln!("invalid tree: {err}"),
    }
}
