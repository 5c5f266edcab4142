use ego_tree::NodeRef;
use scraper::node::Node;
use scraper::ElementRef;

/// All text under `root`, one line per block-level element.
///
/// Whitespace runs collapse to a single space, lines are trimmed and blank
/// lines dropped. Scripting and template content is skipped.
pub(crate) fn block_text(root: ElementRef) -> String {
    let mut ctx = TextContext::default();
    visit_children(root, &mut ctx);
    ctx.into_text()
}

fn visit_node(node: NodeRef<'_, Node>, ctx: &mut TextContext) {
    match node.value() {
        Node::Text(text) => ctx.append_text(text),
        Node::Element(_) => {
            if let Some(element) = ElementRef::wrap(node) {
                visit_element(element, ctx);
            }
        }
        _ => {
            for child in node.children() {
                visit_node(child, ctx);
            }
        }
    }
}

fn visit_element(element: ElementRef, ctx: &mut TextContext) {
    let tag = element.value().name().to_ascii_lowercase();
    match tag.as_str() {
        "script" | "style" | "noscript" | "template" | "iframe" | "svg" | "head" => {}
        "br" | "hr" => ctx.ensure_newline(),
        tag if is_block(tag) => {
            ctx.ensure_newline();
            visit_children(element, ctx);
            ctx.ensure_newline();
        }
        _ => visit_children(element, ctx),
    }
}

fn visit_children(element: ElementRef, ctx: &mut TextContext) {
    for child in element.children() {
        visit_node(child, ctx);
    }
}

fn is_block(tag: &str) -> bool {
    matches!(
        tag,
        "p" | "div"
            | "section"
            | "article"
            | "main"
            | "aside"
            | "header"
            | "footer"
            | "nav"
            | "figure"
            | "figcaption"
            | "blockquote"
            | "address"
            | "pre"
            | "ul"
            | "ol"
            | "li"
            | "dl"
            | "dt"
            | "dd"
            | "table"
            | "thead"
            | "tbody"
            | "tr"
            | "td"
            | "th"
            | "caption"
            | "form"
            | "fieldset"
            | "details"
            | "summary"
            | "h1"
            | "h2"
            | "h3"
            | "h4"
            | "h5"
            | "h6"
            | "body"
            | "html"
    )
}

#[derive(Default)]
struct TextContext {
    builder: String,
    last_char: Option<char>,
}

impl TextContext {
    fn append_text(&mut self, text: &str) {
        for ch in text.chars() {
            if ch.is_whitespace() {
                if self.last_char == Some(' ') || self.last_char == Some('\n') {
                    continue;
                }
                self.push_char(' ');
            } else {
                self.push_char(ch);
            }
        }
    }

    fn ensure_newline(&mut self) {
        if self.last_char == Some('\n') || self.builder.is_empty() {
            return;
        }
        self.push_char('\n');
    }

    fn push_char(&mut self, ch: char) {
        self.builder.push(ch);
        self.last_char = Some(ch);
    }

    fn into_text(self) -> String {
        self.builder
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
