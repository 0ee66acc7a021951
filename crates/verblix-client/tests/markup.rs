use verblix_client::markup::{Affordance, Block, Rendered};

#[test]
fn plain_text_is_one_prose_block() {
    let rendered = Rendered::parse("Just words.\nOn two lines.");
    assert_eq!(
        rendered.blocks,
        vec![Block::Prose("Just words.\nOn two lines.".to_string())]
    );
    assert_eq!(rendered.copy_text(Affordance::CopyAll), Some("Just words.\nOn two lines."));
    assert_eq!(rendered.copy_text(Affordance::CopyCode(1)), None);
}

#[test]
fn tilde_fences_and_untagged_blocks() {
    let rendered = Rendered::parse("~~~\nls -la\n~~~\n```python\nprint(1)\n```");
    assert_eq!(
        rendered.blocks,
        vec![
            Block::Code {
                language: None,
                code: "ls -la".to_string(),
            },
            Block::Code {
                language: Some("python".to_string()),
                code: "print(1)".to_string(),
            },
        ]
    );
    assert_eq!(rendered.copy_text(Affordance::CopyCode(2)), Some("print(1)"));
    assert_eq!(rendered.copy_text(Affordance::CopyCode(0)), None);
}

#[test]
fn unterminated_fence_runs_to_the_end() {
    let rendered = Rendered::parse("Here:\n```sh\necho hi\necho bye");
    assert_eq!(
        rendered.blocks,
        vec![
            Block::Prose("Here:".to_string()),
            Block::Code {
                language: Some("sh".to_string()),
                code: "echo hi\necho bye".to_string(),
            },
        ]
    );
}

#[test]
fn a_different_fence_does_not_close_the_block() {
    let rendered = Rendered::parse("```\n~~~\n```");
    assert_eq!(
        rendered.code_blocks().collect::<Vec<_>>(),
        vec!["~~~"]
    );
}
