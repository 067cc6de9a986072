use crate::domain::model::{GenericValue, ATTRIBUTE_MARKER, TEXT_MARKER};
use crate::utils::error::{ConvertError, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde_json::Map;

/// 將 XML 文字解析成通用樹狀結構
///
/// 輸出格式：
/// - 最外層為 `{ 根元素名稱: 根元素值 }`
/// - 每個子元素一律包成陣列，重複的同名元素依序加入
/// - 屬性放在 `$` 底下
/// - 只有文字的元素直接以字串表示；同時有屬性或子元素時，文字放在 `_` 底下
pub fn parse_xml(input: &str) -> Result<GenericValue> {
    let input = input.strip_prefix('\u{feff}').unwrap_or(input);
    let mut reader = Reader::from_str(input);
    reader.trim_text(false);

    let mut stack: Vec<XmlNode> = Vec::new();
    let mut root: Option<XmlNode> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(tag)) => {
                let node = XmlNode::from_start(&tag)?;
                ensure_single_root(&stack, &root, &node.name)?;
                stack.push(node);
            }
            Ok(Event::Empty(tag)) => {
                let node = XmlNode::from_start(&tag)?;
                ensure_single_root(&stack, &root, &node.name)?;
                attach(node, &mut stack, &mut root);
            }
            Ok(Event::End(_)) => {
                if let Some(node) = stack.pop() {
                    attach(node, &mut stack, &mut root);
                }
            }
            Ok(Event::Text(text)) => {
                let text = text.unescape().map_err(|e| ConvertError::XmlError {
                    message: format!("Failed to unescape text: {}", e),
                })?;
                match stack.last_mut() {
                    Some(current) => current.text.push_str(&text),
                    None if !text.trim().is_empty() => {
                        return Err(ConvertError::XmlError {
                            message: format!(
                                "Non-whitespace text outside the root element at position {}",
                                reader.buffer_position()
                            ),
                        });
                    }
                    None => {}
                }
            }
            Ok(Event::CData(data)) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&String::from_utf8_lossy(&data.into_inner()));
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ConvertError::XmlError {
                    message: format!(
                        "Error parsing XML at position {}: {}",
                        reader.buffer_position(),
                        e
                    ),
                })
            }
            // 註解、處理指令、宣告與 DOCTYPE 略過
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(ConvertError::XmlError {
            message: format!("Unclosed element: <{}>", open.name),
        });
    }

    let root = root.ok_or_else(|| ConvertError::XmlError {
        message: "Document has no root element".to_string(),
    })?;

    let mut document = Map::new();
    let name = root.name.clone();
    document.insert(name, root.into_value());
    Ok(GenericValue::Object(document))
}

fn ensure_single_root(stack: &[XmlNode], root: &Option<XmlNode>, name: &str) -> Result<()> {
    if stack.is_empty() && root.is_some() {
        return Err(ConvertError::XmlError {
            message: format!("Unexpected second root element: <{}>", name),
        });
    }
    Ok(())
}

fn attach(node: XmlNode, stack: &mut [XmlNode], root: &mut Option<XmlNode>) {
    match stack.last_mut() {
        Some(parent) => parent.add_child(node),
        None => *root = Some(node),
    }
}

#[derive(Debug)]
struct XmlNode {
    name: String,
    attributes: Map<String, GenericValue>,
    children: Map<String, GenericValue>,
    text: String,
}

impl XmlNode {
    fn from_start(start: &BytesStart) -> Result<Self> {
        let name = std::str::from_utf8(start.name().as_ref())
            .map_err(|e| ConvertError::XmlError {
                message: format!("Invalid element name: {}", e),
            })?
            .to_string();

        let mut attributes = Map::new();
        for attr_result in start.attributes() {
            let attr = attr_result.map_err(|e| ConvertError::XmlError {
                message: format!("Failed to parse attribute: {}", e),
            })?;
            let key = std::str::from_utf8(attr.key.as_ref())
                .map_err(|e| ConvertError::XmlError {
                    message: format!("Invalid attribute name: {}", e),
                })?
                .to_string();
            let value = attr.unescape_value().map_err(|e| ConvertError::XmlError {
                message: format!("Failed to unescape attribute value: {}", e),
            })?;
            attributes.insert(key, GenericValue::String(value.into_owned()));
        }

        Ok(Self {
            name,
            attributes,
            children: Map::new(),
            text: String::new(),
        })
    }

    fn add_child(&mut self, child: XmlNode) {
        let name = child.name.clone();
        let value = child.into_value();
        match self.children.get_mut(&name) {
            Some(GenericValue::Array(siblings)) => siblings.push(value),
            _ => {
                self.children.insert(name, GenericValue::Array(vec![value]));
            }
        }
    }

    fn into_value(self) -> GenericValue {
        if self.attributes.is_empty() && self.children.is_empty() {
            return GenericValue::String(self.text);
        }

        let mut obj = Map::new();
        if !self.text.trim().is_empty() {
            obj.insert(TEXT_MARKER.to_string(), GenericValue::String(self.text));
        }
        if !self.attributes.is_empty() {
            obj.insert(
                ATTRIBUTE_MARKER.to_string(),
                GenericValue::Object(self.attributes),
            );
        }
        obj.extend(self.children);
        GenericValue::Object(obj)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_children_are_wrapped_in_arrays() {
        let value = parse_xml("<root><item>1</item></root>").unwrap();
        assert_eq!(value, json!({"root": {"item": ["1"]}}));
    }

    #[test]
    fn test_repeated_siblings_append() {
        let value = parse_xml("<list><v>a</v><v>b</v><w>c</w><v>d</v></list>").unwrap();
        assert_eq!(value, json!({"list": {"v": ["a", "b", "d"], "w": ["c"]}}));
    }

    #[test]
    fn test_attributes_and_text() {
        let value = parse_xml(r#"<root><amount currency="EUR">10.5</amount></root>"#).unwrap();
        assert_eq!(
            value,
            json!({"root": {"amount": [{"_": "10.5", "$": {"currency": "EUR"}}]}})
        );
    }

    #[test]
    fn test_empty_elements() {
        let value = parse_xml(r#"<root><a/><b></b><c flag="y"/></root>"#).unwrap();
        assert_eq!(
            value,
            json!({"root": {"a": [""], "b": [""], "c": [{"$": {"flag": "y"}}]}})
        );
    }

    #[test]
    fn test_whitespace_between_children_is_dropped() {
        let xml = "<?xml version=\"1.0\"?>\n<root>\n  <!-- note -->\n  <a>x</a>\n  <b>y</b>\n</root>\n";
        assert_eq!(
            parse_xml(xml).unwrap(),
            json!({"root": {"a": ["x"], "b": ["y"]}})
        );
    }

    #[test]
    fn test_entities_and_cdata() {
        let value = parse_xml("<root><t>a &amp; b</t><c><![CDATA[<raw>]]></c></root>").unwrap();
        assert_eq!(value, json!({"root": {"t": ["a & b"], "c": ["<raw>"]}}));
    }

    #[test]
    fn test_text_only_root() {
        assert_eq!(parse_xml("<root>hello</root>").unwrap(), json!({"root": "hello"}));
    }

    #[test]
    fn test_malformed_xml_is_rejected() {
        assert!(matches!(
            parse_xml("<root><unclosed></root>"),
            Err(ConvertError::XmlError { .. })
        ));
        assert!(parse_xml("<root><open>").is_err());
        assert!(parse_xml("").is_err());
        assert!(parse_xml("just text").is_err());
        assert!(parse_xml("<a/><b/>").is_err());
    }
}
