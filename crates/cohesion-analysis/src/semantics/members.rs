//! Lightweight typing: enough to resolve `x.Method()` to a module method.
//!
//! Only named types declared in the module are tracked. Anything else
//! (imported types, builtin containers, untyped expressions) is unknown,
//! which leaves the selected member opaque rather than failing.

use cohesion_core::types::collections::SmallVec2;
use tree_sitter::Node;

use super::resolver::{LiteralShape, Resolver, TypeRef};
use super::symbols::{SymbolId, SymbolKind};
use super::syntax::{field_children, named_children};

const MAX_DEPTH: usize = 8;

/// What a selector's field denotes on a known type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Member {
    Method(SymbolId),
    /// A struct field, with its named local type if it has one.
    Field(Option<SymbolId>),
}

impl<'a> Resolver<'a> {
    /// Named local type denoted by a type expression, aliases followed.
    pub(super) fn named_type(&self, ty: TypeRef<'a>) -> Option<SymbolId> {
        let id = self.named_type_direct(ty)?;
        Some(self.resolve_alias(id))
    }

    fn named_type_direct(&self, ty: TypeRef<'a>) -> Option<SymbolId> {
        let mut node = ty.node;
        loop {
            match node.kind() {
                "pointer_type" | "parenthesized_type" => node = *named_children(node).first()?,
                "generic_type" => node = node.child_by_field_name("type")?,
                "type_identifier" | "identifier" => break,
                _ => return None,
            }
        }
        let id = self.lookup(self.text_in(ty.file, node))?;
        (self.symbols[id.index()].kind == SymbolKind::Type).then_some(id)
    }

    fn resolve_alias(&self, mut id: SymbolId) -> SymbolId {
        for _ in 0..MAX_DEPTH {
            if !self.aliases.contains(&id) {
                break;
            }
            match self
                .type_bodies
                .get(&id)
                .and_then(|body| self.named_type_direct(*body))
            {
                Some(next) if next != id => id = next,
                _ => break,
            }
        }
        id
    }

    /// Named local type of an expression, if it can be read off the syntax.
    pub(super) fn infer_type(&self, expr: Node<'a>) -> Option<SymbolId> {
        self.infer_type_at(expr, 0)
    }

    fn infer_type_at(&self, expr: Node<'a>, depth: usize) -> Option<SymbolId> {
        if depth > MAX_DEPTH {
            return None;
        }
        match expr.kind() {
            "identifier" | "type_identifier" => {
                let id = self.lookup(self.text(expr))?;
                match self.symbols[id.index()].kind {
                    SymbolKind::Type => Some(self.resolve_alias(id)),
                    SymbolKind::Var | SymbolKind::Const => self.var_types.get(&id).copied(),
                    _ => None,
                }
            }
            "parenthesized_expression" => {
                self.infer_type_at(*named_children(expr).first()?, depth + 1)
            }
            "unary_expression" => {
                let operator = expr.child_by_field_name("operator")?;
                if !matches!(operator.kind(), "&" | "*") {
                    return None;
                }
                self.infer_type_at(expr.child_by_field_name("operand")?, depth + 1)
            }
            "composite_literal" => self.named_type(self.here(expr.child_by_field_name("type")?)),
            "type_assertion_expression" | "type_conversion_expression" => {
                self.named_type(self.here(expr.child_by_field_name("type")?))
            }
            "call_expression" => {
                let function = expr.child_by_field_name("function")?;
                let callee = match function.kind() {
                    "identifier" => self.lookup(self.text(function))?,
                    "selector_expression" => match self.member_at(function, depth + 1)? {
                        Member::Method(id) => id,
                        Member::Field(_) => return None,
                    },
                    _ => return None,
                };
                match self.symbols[callee.index()].kind {
                    SymbolKind::Func | SymbolKind::Method { .. } => {
                        self.results.get(&callee).copied()
                    }
                    // Conversion `T(x)`.
                    SymbolKind::Type => Some(self.resolve_alias(callee)),
                    _ => None,
                }
            }
            "selector_expression" => match self.member_at(expr, depth + 1)? {
                Member::Field(ty) => ty,
                Member::Method(_) => None,
            },
            _ => None,
        }
    }

    /// Member selected by `operand.field`, when the operand's type is known.
    pub(super) fn member_of(&self, selector: Node<'a>) -> Option<Member> {
        self.member_at(selector, 0)
    }

    fn member_at(&self, selector: Node<'a>, depth: usize) -> Option<Member> {
        let operand = selector.child_by_field_name("operand")?;
        let field = selector.child_by_field_name("field")?;
        let ty = self.infer_type_at(operand, depth)?;
        self.lookup_member(ty, self.text(field), 0)
    }

    /// Method set first, then fields, then promoted members of embedded types.
    fn lookup_member(&self, ty: SymbolId, name: &str, depth: usize) -> Option<Member> {
        if depth > MAX_DEPTH {
            return None;
        }
        let ty = self.resolve_alias(ty);
        if let Some(method) = self.methods.get(&ty).and_then(|set| set.get(name)) {
            return Some(Member::Method(*method));
        }

        let body = *self.type_bodies.get(&ty)?;
        let mut embedded: SmallVec2<SymbolId> = SmallVec2::new();
        match body.node.kind() {
            "struct_type" => {
                for list in named_children(body.node) {
                    if list.kind() != "field_declaration_list" {
                        continue;
                    }
                    for decl in named_children(list) {
                        if decl.kind() != "field_declaration" {
                            continue;
                        }
                        let Some(field_type) = decl.child_by_field_name("type") else {
                            continue;
                        };
                        let field_type = TypeRef {
                            file: body.file,
                            node: field_type,
                        };
                        let names = field_children(decl, "name");
                        if names.is_empty() {
                            if self.base_type_name(field_type) == Some(name) {
                                return Some(Member::Field(self.named_type(field_type)));
                            }
                            if let Some(inner) = self.named_type(field_type) {
                                embedded.push(inner);
                            }
                        } else if names.iter().any(|n| self.text_in(body.file, *n) == name) {
                            return Some(Member::Field(self.named_type(field_type)));
                        }
                    }
                }
            }
            "interface_type" => {
                for elem in named_children(body.node) {
                    if matches!(elem.kind(), "method_elem" | "method_spec") {
                        continue;
                    }
                    let inner = if elem.kind() == "type_elem" {
                        named_children(elem).first().copied()
                    } else {
                        Some(elem)
                    };
                    if let Some(inner) = inner {
                        let inner = TypeRef {
                            file: body.file,
                            node: inner,
                        };
                        if let Some(id) = self.named_type(inner) {
                            embedded.push(id);
                        }
                    }
                }
            }
            // Defined type `type B A` keeps the fields of A.
            _ => {
                if let Some(id) = self.named_type(body) {
                    embedded.push(id);
                }
            }
        }

        embedded
            .into_iter()
            .filter(|inner| *inner != ty)
            .find_map(|inner| self.lookup_member(inner, name, depth + 1))
    }

    fn base_type_name(&self, ty: TypeRef<'a>) -> Option<&'a str> {
        let mut node = ty.node;
        loop {
            match node.kind() {
                "pointer_type" | "parenthesized_type" => node = *named_children(node).first()?,
                "generic_type" => node = node.child_by_field_name("type")?,
                "qualified_type" => node = node.child_by_field_name("name")?,
                "type_identifier" | "identifier" => return Some(self.text_in(ty.file, node)),
                _ => return None,
            }
        }
    }

    /// How a composite literal of type `ty` interprets its bare keys.
    pub(super) fn literal_shape(&self, ty: TypeRef<'a>, depth: usize) -> LiteralShape<'a> {
        if depth > MAX_DEPTH {
            return LiteralShape::Unknown;
        }
        let child = |field: &str| {
            ty.node.child_by_field_name(field).map(|node| TypeRef {
                file: ty.file,
                node,
            })
        };
        match ty.node.kind() {
            "struct_type" => LiteralShape::Struct,
            "map_type" => LiteralShape::Map(child("value")),
            "slice_type" | "array_type" | "implicit_length_array_type" => {
                LiteralShape::Sequence(child("element"))
            }
            "pointer_type" | "parenthesized_type" => match named_children(ty.node).first() {
                Some(inner) => self.literal_shape(
                    TypeRef {
                        file: ty.file,
                        node: *inner,
                    },
                    depth + 1,
                ),
                None => LiteralShape::Unknown,
            },
            "type_identifier" | "generic_type" => {
                match self
                    .named_type(ty)
                    .and_then(|id| self.type_bodies.get(&id).copied())
                {
                    Some(body) => self.literal_shape(body, depth + 1),
                    None => LiteralShape::Unknown,
                }
            }
            _ => LiteralShape::Unknown,
        }
    }

    /// Shape of elided element literals such as `[]T{{...}}`.
    pub(super) fn element_shape(&self, shape: LiteralShape<'a>) -> LiteralShape<'a> {
        match shape {
            LiteralShape::Sequence(Some(element)) | LiteralShape::Map(Some(element)) => {
                self.literal_shape(element, 0)
            }
            _ => LiteralShape::Unknown,
        }
    }
}
