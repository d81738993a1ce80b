use super::model::{Block, BlockBody};

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

fn or_default<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() {
        fallback
    } else {
        value
    }
}

/// Pure presentation dispatch on block type. An unrecognized type renders a
/// placeholder rather than failing, so schema drift never crashes a viewer.
pub fn render(block: &Block) -> String {
    match &block.body {
        BlockBody::Hero(c) => format!(
            concat!(
                r#"<section class="block-hero">"#,
                "<h1>{title}</h1>",
                "<p>{subtitle}</p>",
                "<button>{cta}</button>",
                "</section>"
            ),
            title = escape(or_default(&c.title, "Your Hero Title")),
            subtitle = escape(&c.subtitle),
            cta = escape(or_default(&c.cta_text, "Get Started")),
        ),
        BlockBody::Text(c) => format!(
            r#"<section class="block-text"><h2>{}</h2><p>{}</p></section>"#,
            escape(or_default(&c.heading, "Section Heading")),
            escape(&c.body),
        ),
        BlockBody::Image(c) => format!(
            r#"<figure class="block-image"><img src="{}" alt="{}"><figcaption>{}</figcaption></figure>"#,
            escape(&c.url),
            escape(&c.caption),
            escape(&c.caption),
        ),
        BlockBody::Features(c) => {
            let pairs = [
                (&c.feature1_title, &c.feature1_desc, "Feature 1"),
                (&c.feature2_title, &c.feature2_desc, "Feature 2"),
                (&c.feature3_title, &c.feature3_desc, "Feature 3"),
            ];
            let cards: String = pairs
                .iter()
                .map(|(title, desc, fallback)| {
                    format!(
                        r#"<div class="feature"><h3>{}</h3><p>{}</p></div>"#,
                        escape(or_default(title, fallback)),
                        escape(desc),
                    )
                })
                .collect();
            format!(r#"<section class="block-features">{cards}</section>"#)
        }
        BlockBody::Unknown { .. } => r#"<div class="block-unknown">Unknown block</div>"#.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::model::{BlockKind, HeroContent};
    use serde_json::json;

    #[test]
    fn hero_renders_fields_with_fallbacks() {
        let html = render(&Block {
            id: "h".into(),
            body: BlockBody::Hero(HeroContent {
                title: "Welcome".into(),
                subtitle: String::new(),
                cta_text: String::new(),
            }),
        });
        assert!(html.contains("<h1>Welcome</h1>"));
        assert!(html.contains("Get Started"));
    }

    #[test]
    fn unknown_type_renders_placeholder() {
        let block: Block =
            serde_json::from_value(json!({ "id": "x", "type": "carousel", "content": {} }))
                .unwrap();
        assert_eq!(render(&block), r#"<div class="block-unknown">Unknown block</div>"#);
    }

    #[test]
    fn output_is_escaped() {
        let mut block = Block::new(BlockKind::Text);
        if let BlockBody::Text(c) = &mut block.body {
            c.heading = "<script>".into();
        }
        let html = render(&block);
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }
}
