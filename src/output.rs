//! Render the reduced AST to CSS text.

use crate::{
    ast::{Block, Group, Keyframes, Media, Node, Page, Root, Segment},
    OutputStyle,
};

/// Trim a float the way CSS wants it: no trailing zeros, no bare `-0`.
pub(crate) fn format_float(float: f64) -> String {
    if float.is_infinite() {
        return if float.is_sign_negative() {
            "-Infinity".to_owned()
        } else {
            "Infinity".to_owned()
        };
    }

    let mut buffer = String::with_capacity(3);
    if float < 0.0 {
        buffer.push('-');
    }

    let num = float.abs();
    buffer.push_str(
        format!("{:.10}", num)
            .trim_end_matches('0')
            .trim_end_matches('.'),
    );

    if buffer.is_empty() || buffer == "-" || buffer == "-0" {
        buffer = "0".to_owned();
    }

    buffer
}

pub(crate) struct Serializer {
    buffer: String,
    indent_width: usize,
    compressed: bool,
}

impl Serializer {
    pub fn new(style: OutputStyle) -> Self {
        Serializer {
            buffer: String::new(),
            indent_width: 2,
            compressed: matches!(style, OutputStyle::Compressed),
        }
    }

    pub fn render(mut self, root: &Root) -> String {
        for node in &root.nodes {
            self.visit_stmt(node, &[], 0);
        }
        if !self.compressed && !self.buffer.is_empty() && !self.buffer.ends_with('\n') {
            self.buffer.push('\n');
        }
        self.buffer
    }

    fn visit_stmt(&mut self, node: &Node, ctx: &[String], depth: usize) {
        match node {
            Node::Group(group) => self.visit_group(group, ctx, depth),
            Node::Media(media) => self.visit_media(media, ctx, depth),
            Node::Keyframes(frames) => self.visit_keyframes(frames, depth),
            Node::Page(page) => self.visit_page(page, depth),
            Node::Charset(charset) => {
                self.write_indent(depth);
                self.buffer
                    .push_str(&format!("@charset \"{}\";", charset.val.val));
                self.end_line();
            }
            Node::Import(import) => {
                self.write_indent(depth);
                self.buffer
                    .push_str(&format!("@import {};", import.path.to_css(true)));
                self.end_line();
            }
            Node::Literal(lit) => {
                self.write_indent(depth);
                self.buffer.push_str(&lit.text);
                self.end_line();
            }
            Node::Block(block) => {
                for child in &block.nodes {
                    self.visit_stmt(child, ctx, depth);
                }
            }
            _ => {}
        }
    }

    fn visit_group(&mut self, group: &Group, ctx: &[String], depth: usize) {
        let own: Vec<String> = group
            .selectors
            .iter()
            .map(|s| {
                s.parts
                    .segments
                    .iter()
                    .map(|seg| match seg {
                        Segment::Text(text) => text.clone(),
                        Segment::Expr(e) => e.to_css(false),
                    })
                    .collect::<String>()
            })
            .collect();

        let combined = combine_selectors(ctx, &own);
        let (props, nested) = split_block(&group.block);

        if !props.is_empty() {
            self.open_rule(&combined.join(self.selector_separator()), depth);
            self.write_properties(&props, depth + 1);
            self.close_rule(depth);
        }

        for node in nested {
            self.visit_stmt(node, &combined, depth);
        }
    }

    fn visit_media(&mut self, media: &Media, ctx: &[String], depth: usize) {
        self.open_rule(&format!("@media {}", media.query), depth);
        for node in &media.block.nodes {
            self.visit_stmt(node, ctx, depth + 1);
        }
        self.close_rule(depth);
    }

    fn visit_keyframes(&mut self, frames: &Keyframes, depth: usize) {
        let name = frames
            .name
            .segments
            .iter()
            .map(|seg| match seg {
                Segment::Text(text) => text.clone(),
                Segment::Expr(e) => e.to_css(false),
            })
            .collect::<String>();

        self.open_rule(&format!("@keyframes {}", name), depth);
        for frame in &frames.frames {
            let (props, _) = split_block(&frame.block);
            self.open_rule(&frame.positions.join(self.selector_separator()), depth + 1);
            self.write_properties(&props, depth + 2);
            self.close_rule(depth + 1);
        }
        self.close_rule(depth);
    }

    fn visit_page(&mut self, page: &Page, depth: usize) {
        let header = match &page.selector {
            Some(sel) => format!("@page {}", sel),
            None => "@page".to_owned(),
        };
        let (props, _) = split_block(&page.block);
        self.open_rule(&header, depth);
        self.write_properties(&props, depth + 1);
        self.close_rule(depth);
    }

    fn write_properties(&mut self, props: &[&Node], depth: usize) {
        let count = props.len();
        for (i, node) in props.iter().enumerate() {
            if let Node::Property(prop) = node {
                let name: String = prop
                    .name
                    .segments
                    .iter()
                    .map(|seg| match seg {
                        Segment::Text(text) => text.clone(),
                        Segment::Expr(e) => e.to_css(false),
                    })
                    .collect();
                let value = prop
                    .expr
                    .as_ref()
                    .map(|e| e.to_css(true))
                    .unwrap_or_default();

                self.write_indent(depth);
                if self.compressed {
                    self.buffer.push_str(&format!("{}:{}", name, value));
                    if i + 1 != count {
                        self.buffer.push(';');
                    }
                } else {
                    self.buffer.push_str(&format!("{}: {};", name, value));
                    self.buffer.push('\n');
                }
            }
        }
    }

    fn selector_separator(&self) -> &'static str {
        if self.compressed {
            ","
        } else {
            ",\n"
        }
    }

    fn open_rule(&mut self, header: &str, depth: usize) {
        self.write_indent(depth);
        if self.compressed {
            self.buffer.push_str(header);
            self.buffer.push('{');
        } else {
            // multi-selector headers already contain their own newlines;
            // indent continuation lines to match
            let indented =
                header.replace('\n', &format!("\n{}", " ".repeat(depth * self.indent_width)));
            self.buffer.push_str(&indented);
            self.buffer.push_str(" {\n");
        }
    }

    fn close_rule(&mut self, depth: usize) {
        if self.compressed {
            self.buffer.push('}');
        } else {
            self.write_indent(depth);
            self.buffer.push_str("}\n");
        }
    }

    fn end_line(&mut self) {
        if !self.compressed {
            self.buffer.push('\n');
        }
    }

    fn write_indent(&mut self, depth: usize) {
        if !self.compressed {
            for _ in 0..depth * self.indent_width {
                self.buffer.push(' ');
            }
        }
    }
}

/// Properties first, nested rules after, matching how browsers read
/// nested CSS.
fn split_block(block: &Block) -> (Vec<&Node>, Vec<&Node>) {
    let mut props = Vec::new();
    let mut nested = Vec::new();
    for node in &block.nodes {
        match node {
            Node::Property(..) => props.push(node),
            Node::Group(..)
            | Node::Media(..)
            | Node::Keyframes(..)
            | Node::Page(..)
            | Node::Block(..) => nested.push(node),
            _ => {}
        }
    }
    (props, nested)
}

fn combine_selectors(parents: &[String], own: &[String]) -> Vec<String> {
    if parents.is_empty() {
        return own.to_vec();
    }

    let mut out = Vec::with_capacity(parents.len() * own.len());
    for parent in parents {
        for child in own {
            if child.contains('&') {
                out.push(child.replace('&', parent));
            } else {
                out.push(format!("{} {}", parent, child));
            }
        }
    }
    out
}

#[cfg(test)]
mod test {
    use super::format_float;

    #[test]
    fn floats_are_trimmed() {
        assert_eq!(format_float(10.0), "10");
        assert_eq!(format_float(1.2), "1.2");
        assert_eq!(format_float(-0.0), "0");
        assert_eq!(format_float(0.5), "0.5");
    }
}
