//! Whole-module resolution pass.
//!
//! Package-level declarations of every file are collected first, so uses
//! may precede declarations as Go allows. Function bodies are then walked
//! with a block stack, recording what each identifier use denotes.

use std::collections::BTreeMap;
use std::sync::Arc;

use cohesion_core::types::collections::{FxHashMap, FxHashSet};
use tree_sitter::Node;

use super::predeclared::is_predeclared;
use super::scope::ScopeStack;
use super::symbols::{DeclScope, FileId, Position, Symbol, SymbolId, SymbolKind};
use super::syntax::{children_with_fields, field_children, has_token, named_children, text as node_text};
use super::table::{ModuleSemantics, NodeKey, Use};
use super::SourceUnit;

/// Statements, blocks and literals the resolver nests into before it gives
/// up on a subtree. Operator chains and selector chains do not count.
const MAX_NESTING: usize = 256;

/// A type expression together with the file it appears in.
#[derive(Clone, Copy)]
pub(super) struct TypeRef<'a> {
    pub file: FileId,
    pub node: Node<'a>,
}

/// Package names visible through one file's imports.
#[derive(Default)]
struct FileImports {
    names: FxHashMap<String, String>,
    dot: bool,
}

/// A function, method or interface method whose first result type is
/// inferred once all package types are known.
struct PendingFunc<'a> {
    file: FileId,
    id: SymbolId,
    decl: Node<'a>,
}

/// A package-level variable whose type is inferred after collection.
struct PendingVar<'a> {
    file: FileId,
    id: SymbolId,
    spec: Node<'a>,
    index: usize,
}

/// Shape of a composite literal, deciding how bare keys resolve.
#[derive(Clone, Copy)]
pub(super) enum LiteralShape<'a> {
    Struct,
    Map(Option<TypeRef<'a>>),
    Sequence(Option<TypeRef<'a>>),
    Unknown,
}

pub(super) struct Resolver<'a> {
    module_path: &'a str,
    units: &'a [SourceUnit<'a>],
    file: FileId,
    pub(super) symbols: Vec<Arc<Symbol>>,
    defs: FxHashMap<NodeKey, SymbolId>,
    uses: Vec<BTreeMap<usize, Use>>,
    package_scope: FxHashMap<String, SymbolId>,
    imports: Vec<FileImports>,
    scopes: ScopeStack,
    nesting: usize,
    /// Underlying type expression of every named type.
    pub(super) type_bodies: FxHashMap<SymbolId, TypeRef<'a>>,
    pub(super) aliases: FxHashSet<SymbolId>,
    /// Method sets keyed by receiver base type.
    pub(super) methods: FxHashMap<SymbolId, FxHashMap<String, SymbolId>>,
    /// Named local type of a function's first result.
    pub(super) results: FxHashMap<SymbolId, SymbolId>,
    /// Named local type of a variable.
    pub(super) var_types: FxHashMap<SymbolId, SymbolId>,
}

impl<'a> Resolver<'a> {
    pub(super) fn new(module_path: &'a str, units: &'a [SourceUnit<'a>]) -> Self {
        Self {
            module_path,
            units,
            file: FileId(0),
            symbols: Vec::new(),
            defs: FxHashMap::default(),
            uses: units.iter().map(|_| BTreeMap::new()).collect(),
            package_scope: FxHashMap::default(),
            imports: units.iter().map(|_| FileImports::default()).collect(),
            scopes: ScopeStack::default(),
            nesting: 0,
            type_bodies: FxHashMap::default(),
            aliases: FxHashSet::default(),
            methods: FxHashMap::default(),
            results: FxHashMap::default(),
            var_types: FxHashMap::default(),
        }
    }

    pub(super) fn run(mut self) -> ModuleSemantics {
        let (mut funcs, vars) = self.collect_package_declarations();
        self.collect_methods(&mut funcs);

        for func in &funcs {
            self.file = func.file;
            if let Some(ty) = self.first_result_type(func.decl) {
                self.results.insert(func.id, ty);
            }
        }
        // Two rounds settle `var a = b` chains declared out of order.
        for _ in 0..2 {
            for var in &vars {
                if self.var_types.contains_key(&var.id) {
                    continue;
                }
                self.file = var.file;
                if let Some(ty) = self.infer_var_spec(var.spec, var.index) {
                    self.var_types.insert(var.id, ty);
                }
            }
        }

        let units = self.units;
        for (idx, unit) in units.iter().enumerate() {
            self.file = FileId(idx as u32);
            self.resolve_file(unit.tree.root_node());
        }

        ModuleSemantics::from_parts(
            self.module_path.to_string(),
            self.symbols,
            self.defs,
            self.uses,
        )
    }

    // ---- bookkeeping ----

    pub(super) fn text(&self, node: Node<'_>) -> &'a str {
        self.text_in(self.file, node)
    }

    pub(super) fn text_in(&self, file: FileId, node: Node<'_>) -> &'a str {
        let units = self.units;
        node_text(node, units[file.index()].source)
    }

    pub(super) fn here(&self, node: Node<'a>) -> TypeRef<'a> {
        TypeRef {
            file: self.file,
            node,
        }
    }

    fn record(&mut self, node: Node<'_>, denoted: Use) {
        self.uses[self.file.index()].insert(node.start_byte(), denoted);
    }

    /// Enter one nesting level. Past the limit `node` is recorded as too
    /// deep, which fails every expression containing it.
    fn enter(&mut self, node: Node<'_>) -> bool {
        if self.nesting >= MAX_NESTING {
            let start = node.start_position();
            tracing::debug!(
                kind = node.kind(),
                line = start.row + 1,
                "nesting limit reached, subtree left unresolved"
            );
            self.record(
                node,
                Use::TooDeep {
                    line: start.row as u32 + 1,
                    column: start.column as u32 + 1,
                },
            );
            return false;
        }
        self.nesting += 1;
        true
    }

    fn leave(&mut self) {
        self.nesting -= 1;
    }

    fn declare(&mut self, name: Node<'a>, kind: SymbolKind, scope: DeclScope) -> Option<SymbolId> {
        let units = self.units;
        let unit = &units[self.file.index()];
        let ident = node_text(name, unit.source);
        if ident.is_empty() || ident == "_" {
            return None;
        }
        let start = name.start_position();
        let id = SymbolId(self.symbols.len() as u32);
        self.symbols.push(Arc::new(Symbol {
            package_path: Some(self.module_path.to_string()),
            name: ident.to_string(),
            kind,
            scope,
            position: Some(Position {
                file: unit.display_path.to_string(),
                line: start.row as u32 + 1,
                column: start.column as u32 + 1,
            }),
            offset: unit.base_offset + name.start_byte() as u64,
        }));
        self.defs.insert(
            NodeKey {
                file: self.file,
                start: name.start_byte(),
            },
            id,
        );
        Some(id)
    }

    fn declare_local(&mut self, name: Node<'a>, kind: SymbolKind) -> Option<SymbolId> {
        let id = self.declare(name, kind, DeclScope::Local)?;
        let ident = self.text(name);
        self.scopes.declare(ident, id);
        Some(id)
    }

    /// Symbol an identifier names in the current block, ignoring imports
    /// and the universe.
    pub(super) fn lookup(&self, name: &str) -> Option<SymbolId> {
        if let Some(id) = self.scopes.lookup(name) {
            return Some(id);
        }
        if self.imports[self.file.index()].names.contains_key(name) {
            return None;
        }
        self.package_scope.get(name).copied()
    }

    fn classify(&self, name: &str) -> Use {
        if let Some(id) = self.lookup(name) {
            return Use::Symbol(id);
        }
        let imports = &self.imports[self.file.index()];
        if imports.names.contains_key(name) {
            return Use::External;
        }
        if is_predeclared(name) {
            return Use::Predeclared;
        }
        if imports.dot {
            return Use::External;
        }
        Use::Unresolved(name.into())
    }

    // ---- package-level collection ----

    fn collect_package_declarations(&mut self) -> (Vec<PendingFunc<'a>>, Vec<PendingVar<'a>>) {
        let mut funcs = Vec::new();
        let mut vars = Vec::new();
        let units = self.units;

        for (idx, unit) in units.iter().enumerate() {
            self.file = FileId(idx as u32);
            for decl in named_children(unit.tree.root_node()) {
                match decl.kind() {
                    "import_declaration" => self.collect_imports(decl),
                    "function_declaration" => {
                        let Some(name) = decl.child_by_field_name("name") else {
                            continue;
                        };
                        if let Some(id) = self.declare(name, SymbolKind::Func, DeclScope::Package) {
                            let ident = self.text(name);
                            // init functions are not declared in the package block.
                            if ident != "init" {
                                self.package_scope.insert(ident.to_string(), id);
                            }
                            funcs.push(PendingFunc {
                                file: self.file,
                                id,
                                decl,
                            });
                        }
                    }
                    "type_declaration" => {
                        for spec in type_specs(decl) {
                            if let Some(id) = self.declare_type_spec(spec, DeclScope::Package) {
                                let ident = self.symbols[id.index()].name.clone();
                                self.package_scope.insert(ident, id);
                            }
                        }
                    }
                    "var_declaration" | "const_declaration" => {
                        let is_var = decl.kind() == "var_declaration";
                        let (spec_kind, kind) = if is_var {
                            ("var_spec", SymbolKind::Var)
                        } else {
                            ("const_spec", SymbolKind::Const)
                        };
                        for spec in specs_of(decl, spec_kind) {
                            for (index, name) in field_children(spec, "name").into_iter().enumerate() {
                                let Some(id) = self.declare(name, kind.clone(), DeclScope::Package) else {
                                    continue;
                                };
                                self.package_scope.insert(self.text(name).to_string(), id);
                                if is_var {
                                    vars.push(PendingVar {
                                        file: self.file,
                                        id,
                                        spec,
                                        index,
                                    });
                                }
                            }
                        }
                    }
                    _ => {}
                }
            }
        }
        (funcs, vars)
    }

    fn collect_imports(&mut self, decl: Node<'a>) {
        let mut specs = Vec::new();
        for child in named_children(decl) {
            match child.kind() {
                "import_spec" => specs.push(child),
                "import_spec_list" => specs.extend(
                    named_children(child)
                        .into_iter()
                        .filter(|n| n.kind() == "import_spec"),
                ),
                _ => {}
            }
        }

        for spec in specs {
            let Some(path_node) = spec.child_by_field_name("path") else {
                continue;
            };
            let path = self
                .text(path_node)
                .trim_matches(|c| c == '"' || c == '`')
                .to_string();
            let alias = spec.child_by_field_name("name");
            let alias_text = alias.map(|n| self.text(n));
            let imports = &mut self.imports[self.file.index()];
            match (alias.map(|n| n.kind()), alias_text) {
                (Some("dot"), _) => imports.dot = true,
                (Some("blank_identifier"), _) => {}
                (Some(_), Some(name)) if name == "." => imports.dot = true,
                (Some(_), Some(name)) if name == "_" => {}
                (Some(_), Some(name)) => {
                    imports.names.insert(name.to_string(), path);
                }
                _ => {
                    for candidate in import_name_candidates(&path) {
                        imports.names.insert(candidate, path.clone());
                    }
                }
            }
        }
    }

    fn declare_type_spec(&mut self, spec: Node<'a>, scope: DeclScope) -> Option<SymbolId> {
        if !matches!(spec.kind(), "type_spec" | "type_alias") {
            return None;
        }
        let name = spec.child_by_field_name("name")?;
        let id = self.declare(name, SymbolKind::Type, scope)?;
        if let Some(body) = spec.child_by_field_name("type") {
            let body = self.here(body);
            self.type_bodies.insert(id, body);
        }
        if spec.kind() == "type_alias" {
            self.aliases.insert(id);
        }
        Some(id)
    }

    fn collect_methods(&mut self, funcs: &mut Vec<PendingFunc<'a>>) {
        let units = self.units;
        for (idx, unit) in units.iter().enumerate() {
            self.file = FileId(idx as u32);
            for decl in named_children(unit.tree.root_node()) {
                if decl.kind() != "method_declaration" {
                    continue;
                }
                let Some(name) = decl.child_by_field_name("name") else {
                    continue;
                };
                let receiver = decl
                    .child_by_field_name("receiver")
                    .and_then(receiver_base)
                    .map(|n| self.text(n).to_string())
                    .unwrap_or_default();
                let kind = SymbolKind::Method {
                    receiver: receiver.clone(),
                };
                let Some(id) = self.declare(name, kind, DeclScope::Package) else {
                    continue;
                };
                if let Some(&type_id) = self.package_scope.get(&receiver) {
                    if self.symbols[type_id.index()].kind == SymbolKind::Type {
                        let ident = self.text(name).to_string();
                        self.methods.entry(type_id).or_default().insert(ident, id);
                    }
                }
                funcs.push(PendingFunc {
                    file: self.file,
                    id,
                    decl,
                });
            }
        }

        let mut interfaces: Vec<(SymbolId, TypeRef<'a>)> = self
            .type_bodies
            .iter()
            .filter(|(_, body)| body.node.kind() == "interface_type")
            .map(|(id, body)| (*id, *body))
            .collect();
        interfaces.sort_by_key(|(id, _)| *id);
        for (type_id, body) in interfaces {
            let declared = self.declare_interface_methods(type_id, body);
            funcs.extend(declared);
        }
    }

    fn declare_interface_methods(&mut self, type_id: SymbolId, body: TypeRef<'a>) -> Vec<PendingFunc<'a>> {
        let saved = self.file;
        self.file = body.file;
        let receiver = self.symbols[type_id.index()].name.clone();
        let mut declared = Vec::new();
        for elem in named_children(body.node) {
            if !matches!(elem.kind(), "method_elem" | "method_spec") {
                continue;
            }
            let Some(name) = elem.child_by_field_name("name") else {
                continue;
            };
            let kind = SymbolKind::Method {
                receiver: receiver.clone(),
            };
            if let Some(id) = self.declare(name, kind, DeclScope::Package) {
                let ident = self.text(name).to_string();
                self.methods.entry(type_id).or_default().insert(ident, id);
                declared.push(PendingFunc {
                    file: body.file,
                    id,
                    decl: elem,
                });
            }
        }
        self.file = saved;
        declared
    }

    fn first_result_type(&self, decl: Node<'a>) -> Option<SymbolId> {
        let result = decl.child_by_field_name("result")?;
        let ty = if result.kind() == "parameter_list" {
            named_children(result)
                .into_iter()
                .find(|c| c.kind() == "parameter_declaration")?
                .child_by_field_name("type")?
        } else {
            result
        };
        self.named_type(self.here(ty))
    }

    fn infer_var_spec(&self, spec: Node<'a>, index: usize) -> Option<SymbolId> {
        if let Some(ty) = spec.child_by_field_name("type") {
            return self.named_type(self.here(ty));
        }
        let values = spec
            .child_by_field_name("value")
            .map(expression_items)
            .unwrap_or_default();
        let names = field_children(spec, "name").len();
        if values.len() == names {
            self.infer_type(*values.get(index)?)
        } else if values.len() == 1 && index == 0 {
            self.infer_type(values[0])
        } else {
            None
        }
    }

    // ---- bodies ----

    fn resolve_file(&mut self, root: Node<'a>) {
        for decl in named_children(root) {
            match decl.kind() {
                "package_clause" | "import_declaration" => {}
                "function_declaration" | "method_declaration" => self.resolve_function(decl),
                "type_declaration" => {
                    for spec in type_specs(decl) {
                        self.resolve_type_spec(spec);
                    }
                }
                "var_declaration" => {
                    for spec in specs_of(decl, "var_spec") {
                        self.resolve_spec_values(spec);
                    }
                }
                "const_declaration" => {
                    for spec in specs_of(decl, "const_spec") {
                        self.resolve_spec_values(spec);
                    }
                }
                _ => self.resolve_expr(decl),
            }
        }
    }

    /// Function and method declarations and function literals.
    fn resolve_function(&mut self, decl: Node<'a>) {
        self.scopes.push();
        if let Some(params) = decl.child_by_field_name("type_parameters") {
            self.declare_type_params(params);
        }

        let mut names = Vec::new();
        if let Some(receiver) = decl.child_by_field_name("receiver") {
            names.extend(self.resolve_parameters(receiver, true));
        }
        if let Some(params) = decl.child_by_field_name("parameters") {
            names.extend(self.resolve_parameters(params, false));
        }
        if let Some(result) = decl.child_by_field_name("result") {
            if result.kind() == "parameter_list" {
                names.extend(self.resolve_parameters(result, false));
            } else {
                self.resolve_expr(result);
            }
        }
        for (name, ty) in names {
            if let Some(id) = self.declare_local(name, SymbolKind::Var) {
                if let Some(ty) = ty {
                    self.var_types.insert(id, ty);
                }
            }
        }

        if let Some(body) = decl.child_by_field_name("body") {
            self.resolve_statements(body);
        }
        self.scopes.pop();
    }

    /// Resolve parameter types and return the names to declare with their
    /// named local type.
    fn resolve_parameters(
        &mut self,
        list: Node<'a>,
        receiver: bool,
    ) -> Vec<(Node<'a>, Option<SymbolId>)> {
        let mut declared = Vec::new();
        for param in named_children(list) {
            let variadic = param.kind() == "variadic_parameter_declaration";
            if !variadic && param.kind() != "parameter_declaration" {
                self.resolve_expr(param);
                continue;
            }
            let ty = param.child_by_field_name("type");
            if let Some(ty) = ty {
                if receiver {
                    self.declare_receiver_type_params(ty);
                }
                self.resolve_expr(ty);
            }
            let named = match ty {
                Some(ty) if !variadic => self.named_type(self.here(ty)),
                _ => None,
            };
            for name in field_children(param, "name") {
                declared.push((name, named));
            }
        }
        declared
    }

    fn declare_type_params(&mut self, list: Node<'a>) {
        let decls: Vec<Node<'a>> = named_children(list)
            .into_iter()
            .filter(|n| n.kind() == "type_parameter_declaration")
            .collect();
        for decl in &decls {
            for name in field_children(*decl, "name") {
                self.declare_local(name, SymbolKind::TypeParam);
            }
        }
        for decl in &decls {
            if let Some(constraint) = decl.child_by_field_name("type") {
                self.resolve_expr(constraint);
            }
        }
    }

    /// `func (l *List[T]) ...` declares `T` for the method.
    fn declare_receiver_type_params(&mut self, ty: Node<'a>) {
        let mut node = ty;
        while matches!(node.kind(), "pointer_type" | "parenthesized_type") {
            match named_children(node).first() {
                Some(inner) => node = *inner,
                None => return,
            }
        }
        if node.kind() != "generic_type" {
            return;
        }
        let Some(args) = node.child_by_field_name("type_arguments") else {
            return;
        };
        for arg in named_children(args) {
            let candidates = if arg.kind() == "type_elem" {
                named_children(arg)
            } else {
                vec![arg]
            };
            for candidate in candidates {
                if candidate.kind() == "type_identifier" {
                    self.declare_local(candidate, SymbolKind::TypeParam);
                }
            }
        }
    }

    fn resolve_type_spec(&mut self, spec: Node<'a>) {
        self.scopes.push();
        if let Some(params) = spec.child_by_field_name("type_parameters") {
            self.declare_type_params(params);
        }
        if let Some(ty) = spec.child_by_field_name("type") {
            self.resolve_expr(ty);
        }
        self.scopes.pop();
    }

    fn resolve_spec_values(&mut self, spec: Node<'a>) {
        if let Some(ty) = spec.child_by_field_name("type") {
            self.resolve_expr(ty);
        }
        if let Some(value) = spec.child_by_field_name("value") {
            self.resolve_expr(value);
        }
    }

    /// Statements of a block, in the current scope.
    fn resolve_statements(&mut self, block: Node<'a>) {
        for child in named_children(block) {
            self.resolve_stmt(child);
        }
    }

    fn resolve_stmt(&mut self, stmt: Node<'a>) {
        if !self.enter(stmt) {
            return;
        }
        self.resolve_stmt_kind(stmt);
        self.leave();
    }

    fn resolve_stmt_kind(&mut self, stmt: Node<'a>) {
        match stmt.kind() {
            "block" => {
                self.scopes.push();
                self.resolve_statements(stmt);
                self.scopes.pop();
            }
            "statement_list" => self.resolve_statements(stmt),
            "short_var_declaration" => self.resolve_short_var(stmt),
            "var_declaration" => {
                for spec in specs_of(stmt, "var_spec") {
                    self.resolve_local_spec(spec, SymbolKind::Var);
                }
            }
            "const_declaration" => {
                for spec in specs_of(stmt, "const_spec") {
                    self.resolve_local_spec(spec, SymbolKind::Const);
                }
            }
            "type_declaration" => {
                for spec in type_specs(stmt) {
                    self.resolve_local_type(spec);
                }
            }
            "if_statement" => self.resolve_if(stmt),
            "for_statement" => {
                self.scopes.push();
                for child in named_children(stmt) {
                    match child.kind() {
                        "for_clause" => {
                            for (field, part) in children_with_fields(child) {
                                match field {
                                    Some("condition") => self.resolve_expr(part),
                                    _ => self.resolve_stmt(part),
                                }
                            }
                        }
                        "range_clause" => self.resolve_defining(child),
                        "block" => self.resolve_stmt(child),
                        _ => self.resolve_expr(child),
                    }
                }
                self.scopes.pop();
            }
            "expression_switch_statement" => {
                self.scopes.push();
                for (field, child) in children_with_fields(stmt) {
                    match (field, child.kind()) {
                        (Some("initializer"), _) => self.resolve_stmt(child),
                        (_, "expression_case" | "default_case") => self.resolve_case(child, Some("value")),
                        _ => self.resolve_expr(child),
                    }
                }
                self.scopes.pop();
            }
            "type_switch_statement" => self.resolve_type_switch(stmt),
            "select_statement" => {
                for case in named_children(stmt) {
                    self.resolve_case(case, None);
                }
            }
            "receive_statement" => self.resolve_defining(stmt),
            "labeled_statement" => {
                for child in named_children(stmt) {
                    if child.kind() != "label_name" {
                        self.resolve_stmt(child);
                    }
                }
            }
            "break_statement" | "continue_statement" | "goto_statement" | "fallthrough_statement"
            | "empty_statement" => {}
            _ => self.resolve_expr(stmt),
        }
    }

    /// An `else if` chain is followed in a loop. Each link opens a block
    /// inside the previous one.
    fn resolve_if(&mut self, stmt: Node<'a>) {
        let mut opened = 0;
        let mut next = Some(stmt);
        while let Some(stmt) = next.take() {
            self.scopes.push();
            opened += 1;
            for (field, child) in children_with_fields(stmt) {
                match field {
                    Some("condition") => self.resolve_expr(child),
                    Some("alternative") if child.kind() == "if_statement" => next = Some(child),
                    _ => self.resolve_stmt(child),
                }
            }
        }
        for _ in 0..opened {
            self.scopes.pop();
        }
    }

    /// A case clause in its own block. Children in `value_field` are
    /// expressions; everything else, including a select communication, is
    /// a statement.
    fn resolve_case(&mut self, case: Node<'a>, value_field: Option<&str>) {
        self.scopes.push();
        for (field, child) in children_with_fields(case) {
            if field.is_some() && field == value_field {
                self.resolve_expr(child);
            } else {
                self.resolve_stmt(child);
            }
        }
        self.scopes.pop();
    }

    fn resolve_type_switch(&mut self, stmt: Node<'a>) {
        self.scopes.push();
        let mut alias = None;
        for (field, child) in children_with_fields(stmt) {
            match field {
                Some("initializer") => self.resolve_stmt(child),
                Some("alias") => {
                    alias = expression_items(child)
                        .into_iter()
                        .find(|n| n.kind() == "identifier");
                }
                Some("value") => self.resolve_expr(child),
                _ if matches!(child.kind(), "type_case" | "default_case") => {
                    self.resolve_type_case(child, alias)
                }
                _ => self.resolve_expr(child),
            }
        }
        self.scopes.pop();
    }

    fn resolve_type_case(&mut self, case: Node<'a>, alias: Option<Node<'a>>) {
        self.scopes.push();
        let parts = children_with_fields(case);
        let mut case_types = Vec::new();
        for (field, child) in &parts {
            if *field == Some("type") {
                self.resolve_expr(*child);
                case_types.push(*child);
            }
        }
        if let Some(alias) = alias {
            let ty = match case_types.as_slice() {
                [single] => self.named_type(self.here(*single)),
                _ => None,
            };
            if let Some(id) = self.declare_local(alias, SymbolKind::Var) {
                if let Some(ty) = ty {
                    self.var_types.insert(id, ty);
                }
            }
        }
        for (field, child) in parts {
            if field != Some("type") {
                self.resolve_stmt(child);
            }
        }
        self.scopes.pop();
    }

    fn resolve_short_var(&mut self, stmt: Node<'a>) {
        let rights = stmt
            .child_by_field_name("right")
            .map(expression_items)
            .unwrap_or_default();
        for right in &rights {
            self.resolve_expr(*right);
        }
        let lefts = stmt
            .child_by_field_name("left")
            .map(expression_items)
            .unwrap_or_default();
        let types: Vec<Option<SymbolId>> = (0..lefts.len())
            .map(|i| {
                if rights.len() == lefts.len() {
                    self.infer_type(rights[i])
                } else if rights.len() == 1 && i == 0 {
                    self.infer_type(rights[0])
                } else {
                    None
                }
            })
            .collect();

        for (left, ty) in lefts.into_iter().zip(types) {
            if left.kind() != "identifier" {
                self.resolve_expr(left);
                continue;
            }
            let name = self.text(left);
            if name == "_" {
                continue;
            }
            // Redeclaration in the same block reuses the variable.
            if let Some(existing) = self.scopes.innermost(name) {
                self.record(left, Use::Symbol(existing));
                continue;
            }
            if let Some(id) = self.declare_local(left, SymbolKind::Var) {
                if let Some(ty) = ty {
                    self.var_types.insert(id, ty);
                }
            }
        }
    }

    /// Range clauses and receive statements: `:=` declares the left side.
    fn resolve_defining(&mut self, node: Node<'a>) {
        if !has_token(node, ":=") {
            self.resolve_expr(node);
            return;
        }
        if let Some(right) = node.child_by_field_name("right") {
            self.resolve_expr(right);
        }
        if let Some(left) = node.child_by_field_name("left") {
            for name in expression_items(left) {
                if name.kind() == "identifier" {
                    self.declare_local(name, SymbolKind::Var);
                } else {
                    self.resolve_expr(name);
                }
            }
        }
    }

    fn resolve_local_spec(&mut self, spec: Node<'a>, kind: SymbolKind) {
        self.resolve_spec_values(spec);
        let names = field_children(spec, "name");
        let types: Vec<Option<SymbolId>> = (0..names.len())
            .map(|i| self.infer_var_spec(spec, i))
            .collect();
        for (name, ty) in names.into_iter().zip(types) {
            if let Some(id) = self.declare_local(name, kind.clone()) {
                if let Some(ty) = ty {
                    self.var_types.insert(id, ty);
                }
            }
        }
    }

    fn resolve_local_type(&mut self, spec: Node<'a>) {
        if let Some(id) = self.declare_type_spec(spec, DeclScope::Local) {
            let ident = self.symbols[id.index()].name.clone();
            self.scopes.declare(&ident, id);
            if let Some(body) = self.type_bodies.get(&id).copied() {
                if body.node.kind() == "interface_type" {
                    for method in self.declare_interface_methods(id, body) {
                        if let Some(ty) = self.first_result_type(method.decl) {
                            self.results.insert(method.id, ty);
                        }
                    }
                }
            }
        }
        self.resolve_type_spec(spec);
    }

    // ---- expressions and types ----

    /// Operands are kept on a work list; operator and call chains do not
    /// nest calls.
    pub(super) fn resolve_expr(&mut self, node: Node<'a>) {
        if !self.enter(node) {
            return;
        }
        let mut pending = vec![node];
        while let Some(node) = pending.pop() {
            self.resolve_expr_kind(node, &mut pending);
        }
        self.leave();
    }

    fn resolve_expr_kind(&mut self, node: Node<'a>, pending: &mut Vec<Node<'a>>) {
        match node.kind() {
            "identifier" | "type_identifier" => self.resolve_identifier(node),
            "selector_expression" => self.resolve_selector(node, pending),
            "qualified_type" => {
                for child in named_children(node) {
                    self.record(child, Use::External);
                }
            }
            "composite_literal" => self.resolve_composite(node),
            "func_literal" => self.resolve_function(node),
            "struct_type" => self.resolve_struct_type(node),
            "interface_type" => self.resolve_interface_type(node),
            "function_type" | "method_elem" | "method_spec" => self.resolve_signature(node),
            "parameter_list" => {
                self.resolve_parameters(node, false);
            }
            "literal_value" => self.resolve_literal_value(node, LiteralShape::Unknown),
            "field_identifier" | "package_identifier" | "label_name" | "blank_identifier"
            | "comment" | "dot" => {}
            _ => pending.extend(named_children(node).into_iter().rev()),
        }
    }

    fn resolve_identifier(&mut self, node: Node<'a>) {
        let name = self.text(node);
        if name.is_empty() || name == "_" {
            return;
        }
        let denoted = self.classify(name);
        self.record(node, denoted);
    }

    fn resolve_selector(&mut self, node: Node<'a>, pending: &mut Vec<Node<'a>>) {
        let field = node.child_by_field_name("field");
        if let Some(operand) = node.child_by_field_name("operand") {
            if operand.kind() == "identifier" {
                let name = self.text(operand);
                // An unknown qualifier is taken to be a package name.
                if self.lookup(name).is_none() && !is_predeclared(name) {
                    self.record(operand, Use::External);
                    if let Some(field) = field {
                        self.record(field, Use::External);
                    }
                    return;
                }
            }
            pending.push(operand);
        }
        if let Some(field) = field {
            let denoted = match self.member_of(node) {
                Some(super::members::Member::Method(id)) => Use::Symbol(id),
                _ => Use::Opaque,
            };
            self.record(field, denoted);
        }
    }

    fn resolve_signature(&mut self, node: Node<'a>) {
        if let Some(params) = node.child_by_field_name("parameters") {
            self.resolve_parameters(params, false);
        }
        if let Some(result) = node.child_by_field_name("result") {
            if result.kind() == "parameter_list" {
                self.resolve_parameters(result, false);
            } else {
                self.resolve_expr(result);
            }
        }
    }

    fn resolve_struct_type(&mut self, node: Node<'a>) {
        for list in named_children(node) {
            if list.kind() != "field_declaration_list" {
                continue;
            }
            for decl in named_children(list) {
                if decl.kind() != "field_declaration" {
                    continue;
                }
                if let Some(ty) = decl.child_by_field_name("type") {
                    self.resolve_expr(ty);
                }
            }
        }
    }

    fn resolve_interface_type(&mut self, node: Node<'a>) {
        for elem in named_children(node) {
            self.resolve_expr(elem);
        }
    }

    fn resolve_composite(&mut self, node: Node<'a>) {
        let ty = node.child_by_field_name("type");
        if let Some(ty) = ty {
            self.resolve_expr(ty);
        }
        let shape = ty
            .map(|ty| self.literal_shape(self.here(ty), 0))
            .unwrap_or(LiteralShape::Unknown);
        if let Some(body) = node.child_by_field_name("body") {
            self.resolve_literal_value(body, shape);
        }
    }

    fn resolve_literal_value(&mut self, node: Node<'a>, shape: LiteralShape<'a>) {
        if !self.enter(node) {
            return;
        }
        let element_shape = self.element_shape(shape);
        for elem in named_children(node) {
            if elem.kind() == "keyed_element" {
                let parts = named_children(elem);
                if let Some(key) = parts.first() {
                    self.resolve_literal_key(unwrap_literal_element(*key), shape);
                }
                if let Some(value) = parts.get(1) {
                    self.resolve_literal_item(*value, element_shape);
                }
            } else {
                self.resolve_literal_item(elem, element_shape);
            }
        }
        self.leave();
    }

    fn resolve_literal_key(&mut self, key: Node<'a>, shape: LiteralShape<'a>) {
        match (key.kind(), shape) {
            ("field_identifier", _) | ("identifier", LiteralShape::Struct) => {
                self.record(key, Use::Opaque)
            }
            ("identifier", LiteralShape::Unknown) => {
                // Either a field name or a map key; only names in scope can be keys.
                if matches!(self.classify(self.text(key)), Use::Unresolved(_)) {
                    self.record(key, Use::Opaque);
                } else {
                    self.resolve_identifier(key);
                }
            }
            ("literal_value", _) => self.resolve_literal_value(key, LiteralShape::Unknown),
            _ => self.resolve_expr(key),
        }
    }

    fn resolve_literal_item(&mut self, item: Node<'a>, shape: LiteralShape<'a>) {
        let item = unwrap_literal_element(item);
        if item.kind() == "literal_value" {
            self.resolve_literal_value(item, shape);
        } else {
            self.resolve_expr(item);
        }
    }
}

fn specs_of<'t>(decl: Node<'t>, kind: &str) -> Vec<Node<'t>> {
    let mut out = Vec::new();
    for child in named_children(decl) {
        if child.kind() == kind {
            out.push(child);
        } else if child.kind().ends_with("_spec_list") {
            out.extend(specs_of(child, kind));
        }
    }
    out
}

fn type_specs(decl: Node<'_>) -> Vec<Node<'_>> {
    let mut out = Vec::new();
    for child in named_children(decl) {
        match child.kind() {
            "type_spec" | "type_alias" => out.push(child),
            kind if kind.ends_with("_spec_list") => out.extend(type_specs(child)),
            _ => {}
        }
    }
    out
}

fn expression_items(node: Node<'_>) -> Vec<Node<'_>> {
    if node.kind() == "expression_list" {
        named_children(node)
    } else {
        vec![node]
    }
}

fn unwrap_literal_element(node: Node<'_>) -> Node<'_> {
    if node.kind() == "literal_element" {
        named_children(node).first().copied().unwrap_or(node)
    } else {
        node
    }
}

/// Base type name node of a receiver list: `(s *Stack[T])` yields `Stack`.
fn receiver_base(receiver: Node<'_>) -> Option<Node<'_>> {
    let param = named_children(receiver)
        .into_iter()
        .find(|n| n.kind() == "parameter_declaration")?;
    let mut node = param.child_by_field_name("type")?;
    loop {
        match node.kind() {
            "pointer_type" | "parenthesized_type" => node = *named_children(node).first()?,
            "generic_type" => node = node.child_by_field_name("type")?,
            "type_identifier" => return Some(node),
            _ => return None,
        }
    }
}

/// Names an import may be referred to by when it has no explicit alias.
fn import_name_candidates(path: &str) -> Vec<String> {
    let mut segments = path.rsplit('/');
    let mut last = segments.next().unwrap_or(path);
    let is_major_version = last.len() > 1
        && last.starts_with('v')
        && last[1..].bytes().all(|b| b.is_ascii_digit());
    if is_major_version {
        if let Some(previous) = segments.next() {
            last = previous;
        }
    }

    let mut candidates = vec![last.to_string()];
    let mut push = |candidate: &str| {
        if !candidate.is_empty() && !candidates.iter().any(|c| c == candidate) {
            candidates.push(candidate.to_string());
        }
    };
    if let Some((head, _)) = last.split_once('.') {
        push(head);
    }
    if let Some(rest) = last.strip_prefix("go-") {
        push(rest);
    }
    if let Some(rest) = last.strip_suffix("-go") {
        push(rest);
    }
    push(&last.replace('-', "_"));
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn import_names_follow_go_conventions() {
        assert_eq!(import_name_candidates("fmt"), vec!["fmt"]);
        assert_eq!(import_name_candidates("net/http"), vec!["http"]);
        assert!(import_name_candidates("gopkg.in/yaml.v3").contains(&"yaml".to_string()));
        assert!(import_name_candidates("github.com/x/go-redis").contains(&"redis".to_string()));
        assert_eq!(import_name_candidates("example.com/mod/v2"), vec!["mod"]);
    }
}
