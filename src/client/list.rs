use super::TodoItem;

/// Local copy of the caller's items, newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoList {
    items: Vec<TodoItem>,
}

impl TodoList {
    /// Takes items in the order the server lists them.
    pub fn new(items: Vec<TodoItem>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[TodoItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: i32) -> Option<&TodoItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn remaining(&self) -> usize {
        self.items.iter().filter(|item| !item.completed).count()
    }

    /// A freshly created item goes to the head of the list.
    pub fn push_created(&mut self, item: TodoItem) {
        self.items.insert(0, item);
    }

    /// Swaps in the server's copy of an updated item. Returns `false` when the
    /// id is not held locally.
    pub fn replace(&mut self, item: TodoItem) -> bool {
        match self.items.iter_mut().find(|existing| existing.id == item.id) {
            Some(slot) => {
                *slot = item;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: i32) -> Option<TodoItem> {
        let index = self.items.iter().position(|item| item.id == id)?;
        Some(self.items.remove(index))
    }
}

impl From<Vec<TodoItem>> for TodoList {
    fn from(items: Vec<TodoItem>) -> Self {
        Self::new(items)
    }
}
