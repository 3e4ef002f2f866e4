//! Property tests: any workspace survives being saved and restored.
mod common;
use blockbot::prelude::*;
use blockbot::workspace::BlockConnection;
use common::*;
use proptest::prelude::*;

/// Links `blocks` front to back through `next`.
fn link(blocks: Vec<Block>) -> Block {
    blocks
        .into_iter()
        .rev()
        .reduce(|tail, mut block| {
            block.next = Some(BlockConnection {
                block: Some(Box::new(tail)),
                shadow: None,
            });
            block
        })
        .expect("stacks are never empty")
}

fn repeat(times: u32, body: Block) -> Block {
    Block::new("controls_repeat_ext")
        .with_input("TIMES", Block::new("math_number").with_field("NUM", times))
        .with_input("DO", body)
}

fn arb_block() -> impl Strategy<Value = Block> {
    let leaf = prop_oneof![
        "[a-z]{1,6}".prop_map(|code| action(&code)),
        "[a-zA-Z ]{0,12}".prop_map(|text| speak(&text)),
    ];
    leaf.prop_recursive(3, 48, 6, |inner| {
        (0u32..4, prop::collection::vec(inner, 1..6))
            .prop_map(|(times, body)| repeat(times, link(body)))
    })
}

fn arb_stack() -> impl Strategy<Value = Block> {
    prop::collection::vec(arb_block(), 1..300).prop_map(link)
}

fn save_and_restore<S: ProgramStore>(
    session: &mut Session<S>,
    document: &WorkspaceDocument,
) -> WorkspaceDocument {
    session.select_robot(MODEL, SERIAL);
    session.workspace_mut().load(document.clone());
    session.save().unwrap();
    session.workspace_mut().clear();
    assert!(session.restore().unwrap());
    session.workspace().serialize()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn saved_workspaces_restore_unchanged(stacks in prop::collection::vec(arb_stack(), 0..3)) {
        let mut workspace = Workspace::new();
        for (row, stack) in stacks.into_iter().enumerate() {
            workspace.add_block(stack.at(10.0, row as f64 * 40.0));
        }
        let document = workspace.serialize();
        let expected = compile(&workspace);

        let dir = tempfile::tempdir().unwrap();
        let mut memory = Session::new(Settings::default(), MemoryStore::new());
        let mut files = Session::new(Settings::default(), FileStore::new(dir.path()));

        prop_assert_eq!(&save_and_restore(&mut memory, &document), &document);
        prop_assert_eq!(&save_and_restore(&mut files, &document), &document);
        prop_assert_eq!(memory.compile().unwrap(), expected.clone());
        prop_assert_eq!(files.compile().unwrap(), expected);
    }
}
