//! Export tests for Markdown (editor HTML → Markdown)

use brief_babel::normalize::to_markdown;
use insta::assert_snapshot;

#[test]
fn test_article_export() {
    let html = concat!(
        r#"<h2 style="text-align: center">Filing a motion</h2>"#,
        r#"<p>Read <a href="https://court.example/rules" target="_blank">the rules</a> <u>first</u>.</p>"#,
        "<ul><li><p>One</p></li><li><p>Two</p></li></ul>",
        "<blockquote><p>Quote</p></blockquote>",
        r#"<pre><code class="language-rust">fn x() {}</code></pre>"#,
        r#"<img src="/a.png" alt="A">"#,
    );
    assert_snapshot!(to_markdown(html), @r###"
    ## Filing a motion

    Read [the rules](https://court.example/rules) first.

    - One
    - Two

    > Quote

    ```rust
    fn x() {}
    ```

    ![A](/a.png)
    "###);
}

#[test]
fn test_marks() {
    assert_eq!(
        to_markdown("<p><strong>b</strong> <em>i</em> <code>c</code> <del>d</del></p>"),
        "**b** *i* `c` ~~d~~"
    );
}

#[test]
fn test_task_list() {
    assert_eq!(
        to_markdown(
            r#"<ul data-type="taskList"><li data-type="taskItem" data-checked="true"><p>done</p></li><li data-type="taskItem" data-checked="false"><p>open</p></li></ul>"#
        ),
        "- [x] done\n- [ ] open"
    );
}

#[test]
fn test_ordered_list() {
    assert_eq!(
        to_markdown("<ol><li><p>first</p></li><li><p>second</p></li></ol>"),
        "1. first\n2. second"
    );
}

#[test]
fn test_headings_are_atx() {
    assert_eq!(to_markdown("<h1>One</h1><h4>Four</h4>"), "# One\n\n#### Four");
}
