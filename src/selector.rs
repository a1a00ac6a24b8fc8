//! jQuery-flavoured selectors for the `exclude` and `include` options.
//!
//! Only compound selectors are supported (`input.note[name=x]:checkbox`),
//! grouped with commas. Matching is done against [`FieldElement`], never a
//! live document, so the same rules apply in the browser and in tests.

use std::iter::Peekable;
use std::str::Chars;

use crate::dom::FieldElement;
use crate::error::FormError;
use crate::models::FieldKind;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Pseudo {
    Input,
    Text,
    Password,
    Hidden,
    File,
    Checkbox,
    Radio,
    Submit,
    Button,
    Checked,
    Disabled,
}

impl Pseudo {
    fn parse(name: &str) -> Option<Self> {
        Some(match name {
            "input" => Pseudo::Input,
            "text" => Pseudo::Text,
            "password" => Pseudo::Password,
            "hidden" => Pseudo::Hidden,
            "file" => Pseudo::File,
            "checkbox" => Pseudo::Checkbox,
            "radio" => Pseudo::Radio,
            "submit" => Pseudo::Submit,
            "button" => Pseudo::Button,
            "checked" => Pseudo::Checked,
            "disabled" => Pseudo::Disabled,
            _ => return None,
        })
    }

    fn matches(self, el: &dyn FieldElement) -> bool {
        let kind = el.kind();
        match self {
            Pseudo::Input => matches!(
                el.tag_name().as_str(),
                "input" | "select" | "textarea" | "button"
            ),
            Pseudo::Text => {
                el.tag_name() == "input"
                    && el
                        .attribute("type")
                        .map_or(true, |t| t.eq_ignore_ascii_case("text"))
            }
            Pseudo::Password => kind == FieldKind::Password,
            Pseudo::Hidden => {
                kind == FieldKind::Hidden || el.attribute("hidden").is_some() || !el.is_rendered()
            }
            Pseudo::File => kind == FieldKind::File,
            Pseudo::Checkbox => kind == FieldKind::Checkbox,
            Pseudo::Radio => kind == FieldKind::Radio,
            Pseudo::Submit => kind == FieldKind::Submit,
            Pseudo::Button => el.tag_name() == "button" || kind == FieldKind::Button,
            Pseudo::Checked => {
                matches!(kind, FieldKind::Checkbox | FieldKind::Radio) && el.is_checked()
            }
            Pseudo::Disabled => el.attribute("disabled").is_some(),
        }
    }
}

#[derive(Clone, PartialEq, Debug)]
enum Part {
    Id(String),
    Class(String),
    Attr { name: String, value: Option<String> },
    Pseudo(Pseudo),
}

impl Part {
    fn matches(&self, el: &dyn FieldElement) -> bool {
        match self {
            Part::Id(id) => el.attribute("id").as_deref() == Some(id.as_str()),
            Part::Class(class) => el.has_class(class),
            Part::Attr { name, value: None } => el.attribute(name).is_some(),
            Part::Attr {
                name,
                value: Some(value),
            } => el.attribute(name).as_deref() == Some(value.as_str()),
            Part::Pseudo(pseudo) => pseudo.matches(el),
        }
    }
}

#[derive(Clone, PartialEq, Debug, Default)]
struct Compound {
    tag: Option<String>,
    parts: Vec<Part>,
}

impl Compound {
    fn matches(&self, el: &dyn FieldElement) -> bool {
        if let Some(tag) = &self.tag {
            if *tag != el.tag_name() {
                return false;
            }
        }
        self.parts.iter().all(|part| part.matches(el))
    }
}

#[derive(Clone, PartialEq, Debug)]
pub struct SelectorList {
    selectors: Vec<Compound>,
}

impl SelectorList {
    pub fn parse(source: &str) -> Result<Self, FormError> {
        let mut parser = Parser {
            source,
            chars: source.chars().peekable(),
        };
        Ok(Self {
            selectors: parser.list()?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.selectors.is_empty()
    }

    pub fn matches(&self, el: &dyn FieldElement) -> bool {
        self.selectors.iter().any(|s| s.matches(el))
    }
}

struct Parser<'a> {
    source: &'a str,
    chars: Peekable<Chars<'a>>,
}

impl Parser<'_> {
    fn error(&self, reason: impl Into<String>) -> FormError {
        FormError::selector(self.source, reason)
    }

    fn skip_whitespace(&mut self) {
        while self.chars.peek().map_or(false, |c| c.is_whitespace()) {
            self.chars.next();
        }
    }

    fn list(&mut self) -> Result<Vec<Compound>, FormError> {
        let mut selectors = Vec::new();
        self.skip_whitespace();
        if self.chars.peek().is_none() {
            return Ok(selectors);
        }
        loop {
            self.skip_whitespace();
            selectors.push(self.compound()?);
            self.skip_whitespace();
            match self.chars.next() {
                None => return Ok(selectors),
                Some(',') => continue,
                Some(_) => return Err(self.error("combinators are not supported")),
            }
        }
    }

    fn compound(&mut self) -> Result<Compound, FormError> {
        let mut compound = Compound::default();
        let mut universal = false;

        match self.chars.peek().copied() {
            Some('*') => {
                self.chars.next();
                universal = true;
            }
            Some(c) if is_ident_char(c) => {
                compound.tag = Some(self.ident()?.to_ascii_lowercase());
            }
            _ => {}
        }

        while let Some(&c) = self.chars.peek() {
            match c {
                '#' => {
                    self.chars.next();
                    compound.parts.push(Part::Id(self.ident()?));
                }
                '.' => {
                    self.chars.next();
                    compound.parts.push(Part::Class(self.ident()?));
                }
                '[' => {
                    self.chars.next();
                    compound.parts.push(self.attribute()?);
                }
                ':' => {
                    self.chars.next();
                    let name = self.ident()?;
                    let pseudo = Pseudo::parse(&name)
                        .ok_or_else(|| self.error(format!("unsupported pseudo-class :{}", name)))?;
                    compound.parts.push(Part::Pseudo(pseudo));
                }
                _ => break,
            }
        }

        if !universal && compound.tag.is_none() && compound.parts.is_empty() {
            return Err(self.error("empty selector"));
        }
        Ok(compound)
    }

    fn ident(&mut self) -> Result<String, FormError> {
        let mut ident = String::new();
        while let Some(&c) = self.chars.peek() {
            if !is_ident_char(c) {
                break;
            }
            ident.push(c);
            self.chars.next();
        }
        if ident.is_empty() {
            return Err(self.error("expected identifier"));
        }
        Ok(ident)
    }

    fn attribute(&mut self) -> Result<Part, FormError> {
        self.skip_whitespace();
        let name = self.ident()?;
        self.skip_whitespace();
        match self.chars.next() {
            Some(']') => Ok(Part::Attr { name, value: None }),
            Some('=') => {
                self.skip_whitespace();
                let value = match self.chars.peek().copied() {
                    Some(quote) if quote == '"' || quote == '\'' => {
                        self.chars.next();
                        let mut value = String::new();
                        loop {
                            match self.chars.next() {
                                Some(c) if c == quote => break,
                                Some(c) => value.push(c),
                                None => return Err(self.error("unterminated string")),
                            }
                        }
                        value
                    }
                    _ => self.ident()?,
                };
                self.skip_whitespace();
                match self.chars.next() {
                    Some(']') => Ok(Part::Attr {
                        name,
                        value: Some(value),
                    }),
                    _ => Err(self.error("expected `]`")),
                }
            }
            _ => Err(self.error("unsupported attribute operator")),
        }
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::memory::MemoryField;

    fn default_exclude() -> SelectorList {
        SelectorList::parse(":password, :hidden, :file, .disable_save").unwrap()
    }

    #[test]
    fn default_exclude_rule() {
        let exclude = default_exclude();
        assert!(exclude.matches(&MemoryField::input("password")));
        assert!(exclude.matches(&MemoryField::input("hidden")));
        assert!(exclude.matches(&MemoryField::input("file")));
        assert!(exclude.matches(&MemoryField::input("text").attr("class", "big disable_save")));
        assert!(exclude.matches(&MemoryField::input("text").not_rendered()));
        assert!(!exclude.matches(&MemoryField::input("text")));
        assert!(!exclude.matches(&MemoryField::new("textarea")));
    }

    #[test]
    fn compound_parts_all_apply() {
        let list = SelectorList::parse("input.note[name='first name']:text").unwrap();
        let el = MemoryField::input("text")
            .attr("class", "note")
            .with_name("first name");
        assert!(list.matches(&el));
        assert!(!list.matches(&MemoryField::input("text").attr("class", "note")));
        assert!(!list.matches(&MemoryField::new("textarea").attr("class", "note")));
    }

    #[test]
    fn id_and_tag_selectors() {
        let list = SelectorList::parse("#email, select").unwrap();
        assert!(list.matches(&MemoryField::input("email").with_id("email")));
        assert!(list.matches(&MemoryField::new("SELECT")));
        assert!(!list.matches(&MemoryField::input("text").with_id("other")));
    }

    #[test]
    fn state_pseudos() {
        let checked = SelectorList::parse(":checked").unwrap();
        let ticked = MemoryField::input("checkbox");
        ticked.set_checked(true);
        assert!(checked.matches(&ticked));
        assert!(!checked.matches(&MemoryField::input("checkbox")));

        let disabled = SelectorList::parse(":disabled").unwrap();
        assert!(disabled.matches(&MemoryField::input("text").attr("disabled", "")));
        assert!(!disabled.matches(&MemoryField::input("text")));
    }

    #[test]
    fn type_pseudos() {
        let radio = SelectorList::parse(":radio").unwrap();
        assert!(radio.matches(&MemoryField::input("radio")));
        assert!(!radio.matches(&MemoryField::input("checkbox")));

        let submit = SelectorList::parse(":submit").unwrap();
        assert!(submit.matches(&MemoryField::input("submit")));
        assert!(!submit.matches(&MemoryField::input("text")));

        let button = SelectorList::parse(":button").unwrap();
        assert!(button.matches(&MemoryField::new("button")));
        assert!(button.matches(&MemoryField::input("button")));
        assert!(!button.matches(&MemoryField::input("text")));

        let input = SelectorList::parse(":input").unwrap();
        assert!(input.matches(&MemoryField::new("textarea")));
        assert!(input.matches(&MemoryField::new("select")));
        assert!(!input.matches(&MemoryField::new("div")));
    }

    #[test]
    fn hidden_attribute_counts_as_hidden() {
        let hidden = SelectorList::parse(":hidden").unwrap();
        assert!(hidden.matches(&MemoryField::input("text").attr("hidden", "")));
        assert!(!hidden.matches(&MemoryField::input("text")));
    }

    #[test]
    fn universal_and_bare_attribute() {
        let star = SelectorList::parse("*").unwrap();
        assert!(star.matches(&MemoryField::input("text")));
        assert!(star.matches(&MemoryField::new("textarea")));

        let data = SelectorList::parse("[data-skip]").unwrap();
        assert!(data.matches(&MemoryField::input("text").attr("data-skip", "yes")));
        assert!(!data.matches(&MemoryField::input("text")));

        let starred = SelectorList::parse("*[data-skip]").unwrap();
        assert!(starred.matches(&MemoryField::new("select").attr("data-skip", "")));
    }

    #[test]
    fn empty_list_matches_nothing() {
        let list = SelectorList::parse("  ").unwrap();
        assert!(list.is_empty());
        assert!(!list.matches(&MemoryField::input("text")));
    }

    #[test]
    fn rejects_combinators_and_unknown_pseudos() {
        assert!(matches!(
            SelectorList::parse("form input"),
            Err(FormError::Selector { .. })
        ));
        assert!(SelectorList::parse("div > input").is_err());
        assert!(SelectorList::parse(":visible").is_err());
        assert!(SelectorList::parse("input,,select").is_err());
        assert!(SelectorList::parse("[name=\"x]").is_err());
    }
}
