//! XML解析
//!
//! 文書を属性付きのJSONツリー `{ルート名: 値}` とみなして深さを数える。
//! - 属性: `@_name`
//! - 同名の子要素: 配列
//! - テキストのみの要素: 文字列（子や属性と混在する場合は `#text`）
//!
//! ツリーは組み立てず、イベントループ中の明示スタックで深さを求める。

use crate::error::{Error, Result};
use crate::types::XmlAnalysis;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;

/// ルート要素名と深さを求める
///
/// パース失敗（タグ不一致・未閉じ・ルート要素なし）は `parse_ok: false`
pub fn analyze_xml(bytes: &[u8]) -> XmlAnalysis {
    let text = String::from_utf8_lossy(bytes);
    match scan_xml(&text) {
        Ok((root, depth)) => XmlAnalysis {
            parse_ok: true,
            root,
            depth,
        },
        Err(_) => XmlAnalysis {
            parse_ok: false,
            root: String::new(),
            depth: 0,
        },
    }
}

/// XML文書を走査してルート要素名とJSONツリー換算の深さを返す
///
/// 深さはJSONと同じ数え方（`{ルート名: 値}` のラッパー=1、コンテナだけが深くなる）。
/// 子要素か属性を持つ要素はオブジェクト、同名の兄弟が複数あれば配列が1段増える。
///
/// # Returns
/// * `Ok((ルート要素名, 深さ))`
/// * `Err(Error::Parse)` - 不正なXML
pub fn scan_xml(xml: &str) -> Result<(String, usize)> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<OpenElement> = Vec::new();
    let mut document = ChildGroups::default();
    let mut root: Option<String> = None;

    loop {
        match reader.read_event().map_err(parse_error)? {
            Event::Start(start) => stack.push(OpenElement::open(&start)?),
            Event::Empty(start) => {
                let element = OpenElement::open(&start)?;
                close(&mut stack, &mut document, &mut root, element);
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| Error::Parse("unexpected closing tag".into()))?;
                close(&mut stack, &mut document, &mut root, element);
            }
            Event::Text(text) => {
                text.unescape().map_err(parse_error)?;
            }
            Event::Eof => break,
            // 宣言・コメント・CDATA・処理命令・DOCTYPEは深さに影響しない
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(Error::Parse(format!("unclosed element <{}>", open.name)));
    }
    let root = root.ok_or_else(|| Error::Parse("no root element".into()))?;

    Ok((root, 1 + document.deepest()))
}

struct OpenElement {
    name: String,
    has_attributes: bool,
    children: ChildGroups,
}

impl OpenElement {
    fn open(start: &BytesStart<'_>) -> Result<Self> {
        let mut has_attributes = false;
        for attr in start.attributes() {
            let attr = attr.map_err(parse_error)?;
            attr.unescape_value().map_err(parse_error)?;
            has_attributes = true;
        }

        Ok(Self {
            name: String::from_utf8_lossy(start.name().as_ref()).into_owned(),
            has_attributes,
            children: ChildGroups::default(),
        })
    }

    /// 値としての深さ（文字列になる要素は0）
    fn value_depth(&self) -> usize {
        if self.has_attributes || !self.children.is_empty() {
            1 + self.children.deepest()
        } else {
            0
        }
    }
}

/// 子要素を名前ごとに集計（出現数と最大深さ）
#[derive(Default)]
struct ChildGroups {
    groups: HashMap<String, (usize, usize)>,
}

impl ChildGroups {
    fn add(&mut self, name: String, depth: usize) {
        let entry = self.groups.entry(name).or_insert((0, 0));
        entry.0 += 1;
        entry.1 = entry.1.max(depth);
    }

    fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    fn deepest(&self) -> usize {
        self.groups
            .values()
            .map(|&(count, depth)| if count > 1 { 1 + depth } else { depth })
            .max()
            .unwrap_or(0)
    }
}

fn close(
    stack: &mut [OpenElement],
    document: &mut ChildGroups,
    root: &mut Option<String>,
    element: OpenElement,
) {
    let depth = element.value_depth();
    match stack.last_mut() {
        Some(parent) => parent.children.add(element.name, depth),
        None => {
            root.get_or_insert_with(|| element.name.clone());
            document.add(element.name, depth);
        }
    }
}

fn parse_error(e: impl std::fmt::Display) -> Error {
    Error::Parse(format!("invalid XML: {}", e))
}
