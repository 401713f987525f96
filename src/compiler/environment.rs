use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use crate::compiler::lexer::Position;
use crate::compiler::number::Number;

/// Names bound in every program before it starts running. They cannot be reassigned.
pub const BUILTIN_CONSTANTS: [(&str, i64); 3] = [
    ("null", 0),
    ("true", 1),
    ("false", 0),
];

#[derive(Debug, Default)]
pub struct SymbolTable {
    symbols: HashMap<String, Number>,
    parent: Option<Rc<RefCell<SymbolTable>>>,
}

impl SymbolTable {
    pub fn new_global() -> Rc<RefCell<SymbolTable>> {
        let mut table = SymbolTable::default();

        for (name, value) in BUILTIN_CONSTANTS {
            table.set(name, Number::int(value));
        }

        Rc::new(RefCell::new(table))
    }

    pub fn new_with_parent(parent: Rc<RefCell<SymbolTable>>) -> Rc<RefCell<SymbolTable>> {
        Rc::new(RefCell::new(SymbolTable {
            symbols: HashMap::new(),
            parent: Some(parent),
        }))
    }

    /// Looks `name` up here, then in each parent. Returns a copy of the bound value.
    pub fn get(&self, name: &str) -> Option<Number> {
        self.symbols.get(name).cloned()
            .or_else(|| self.parent.as_ref().and_then(|parent| parent.borrow().get(name)))
    }

    /// Binds `name` in this table only; parents are never modified.
    pub fn set(&mut self, name: &str, value: Number) {
        self.symbols.insert(name.to_owned(), value);
    }

    pub fn contains_local(&self, name: &str) -> bool {
        self.symbols.contains_key(name)
    }
}

/// An evaluation frame: what it is called in tracebacks, where it was entered from,
/// and the symbols visible inside it.
#[derive(Debug)]
pub struct Context {
    pub display_name: String,
    pub parent: Option<Rc<Context>>,
    pub parent_entry_pos: Option<Position>,
    pub symbol_table: Rc<RefCell<SymbolTable>>,
}

impl Context {
    pub fn new_program() -> Rc<Context> {
        Rc::new(Context {
            display_name: String::from("<program>"),
            parent: None,
            parent_entry_pos: None,
            symbol_table: SymbolTable::new_global(),
        })
    }

    pub fn new_with_parent(display_name: impl Into<String>, parent: &Rc<Context>, entry_pos: Position) -> Rc<Context> {
        Rc::new(Context {
            display_name: display_name.into(),
            parent: Some(Rc::clone(parent)),
            parent_entry_pos: Some(entry_pos),
            symbol_table: SymbolTable::new_with_parent(Rc::clone(&parent.symbol_table)),
        })
    }

    pub fn get(&self, name: &str) -> Option<Number> {
        self.symbol_table.borrow().get(name)
    }

    pub fn set(&self, name: &str, value: Number) {
        self.symbol_table.borrow_mut().set(name, value);
    }
}
