//! Export tests for HTML (IR → canonical editor HTML)
//!
//! Markdown is used as the input side since it is the common way content enters the editor.

use brief_babel::normalize::{canonical_html, to_html};
use insta::assert_snapshot;

#[test]
fn test_heading_and_paragraph() {
    assert_snapshot!(to_html("# Hi\n\nSome *text*."), @"<h1>Hi</h1><p>Some <em>text</em>.</p>");
}

#[test]
fn test_link_carries_editor_attributes() {
    assert_snapshot!(
        to_html("**bold** and [link](https://x.example \"T\")"),
        @r#"<p><strong>bold</strong> and <a href="https://x.example" title="T" target="_blank" rel="noopener noreferrer nofollow">link</a></p>"#
    );
}

#[test]
fn test_task_list() {
    assert_snapshot!(
        to_html("- [ ] draft\n- [x] review"),
        @r#"<ul data-type="taskList"><li data-type="taskItem" data-checked="false"><p>draft</p></li><li data-type="taskItem" data-checked="true"><p>review</p></li></ul>"#
    );
}

#[test]
fn test_nested_bullets() {
    assert_snapshot!(
        to_html("- a\n  - b"),
        @"<ul><li><p>a</p><ul><li><p>b</p></li></ul></li></ul>"
    );
}

#[test]
fn test_code_block_is_escaped() {
    assert_snapshot!(to_html("```\nx < y\n```"), @"<pre><code>x &lt; y</code></pre>");
}

#[test]
fn test_block_image() {
    assert_snapshot!(to_html("![A](/a.png)"), @r#"<img src="/a.png" alt="A">"#);
}

#[test]
fn test_hard_break() {
    assert_eq!(to_html("a  \nb"), "<p>a<br>b</p>");
}

#[test]
fn test_canonical_output_is_a_fixed_point() {
    let inputs = [
        "<p>plain</p>",
        r#"<p style="text-align: right"><u>under</u> <s>struck</s></p>"#,
        r#"<ul data-type="taskList"><li data-type="taskItem" data-checked="true"><p>x</p></li></ul>"#,
        "<blockquote><p>q</p></blockquote>",
        r#"<pre><code class="language-sql">SELECT 1;</code></pre>"#,
    ];
    for input in inputs {
        assert_eq!(canonical_html(input), input, "not canonical: {input}");
    }
}
