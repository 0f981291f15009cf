use crate::{
    args::Args,
    file_node::FileNode,
    sort::{SortDirection, SortMode},
};
use ratatui::widgets::ListState;
use std::path::Path;
use tracing::{info, warn};

/// Input the footer is currently collecting
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompt {
    /// File name typed so far
    Find(String),
    ConfirmDelete,
}

/// Application State
pub struct App {
    pub root: FileNode,
    /// Child indices from the root to the directory being viewed
    pub trail: Vec<usize>,
    pub state: ListState,
    pub args: Args,
    pub status_message: Option<String>,
    pub show_help: bool,
    pub prompt: Option<Prompt>,
    pub sort_mode: SortMode,
    pub sort_direction: SortDirection,
}

impl App {
    pub fn new(root: FileNode, args: Args) -> Self {
        let sort_mode = args.sort;
        let sort_direction = if args.ascending {
            SortDirection::Ascending
        } else {
            sort_mode.default_direction()
        };
        let mut app = Self {
            root,
            trail: Vec::new(),
            state: ListState::default(),
            args,
            status_message: None,
            show_help: false,
            prompt: None,
            sort_mode,
            sort_direction,
        };
        app.prepare_current_view();
        app.select_name(None);
        app
    }

    /// Scan the current directory if needed, measure its entries and sort them
    fn prepare_current_view(&mut self) {
        if let Some(node) = self.root.descendant_mut(&self.trail) {
            if !node.is_scanned() {
                node.scan_best_effort();
            }
            for child in node.children_mut().unwrap_or_default() {
                child.size();
            }
        }
        self.sort_current_view();
    }

    pub fn sort_current_view(&mut self) {
        let (mode, direction) = (self.sort_mode, self.sort_direction);
        let Some(node) = self.root.descendant_mut(&self.trail) else {
            return;
        };
        match mode {
            SortMode::Size => node.sort_by_size(direction),
            SortMode::Created => node.sort_by_creation_time(direction),
            SortMode::Name => node.sort_by_name(direction),
        }
    }

    /// Switch to `mode`, or flip the direction if it is already active
    pub fn toggle_sort(&mut self, mode: SortMode) {
        if self.sort_mode == mode {
            self.sort_direction = SortDirection::from_ascending(self.sort_direction == SortDirection::Descending);
        } else {
            self.sort_mode = mode;
            self.sort_direction = mode.default_direction();
        }
        let selected = self.selected_name();
        self.sort_current_view();
        self.select_name(selected);
        self.status_message = Some(format!("Sort: {} {}", self.sort_mode.name(), self.sort_direction.name()));
    }

    pub fn current_node(&self) -> &FileNode {
        self.root.descendant(&self.trail).unwrap_or(&self.root)
    }

    pub fn current_children(&self) -> &[FileNode] {
        self.current_node().children().unwrap_or_default()
    }

    pub fn current_path(&self) -> &Path {
        self.current_node().path().unwrap_or_else(|| Path::new(""))
    }

    pub fn current_total_size(&self) -> u64 {
        self.current_children()
            .iter()
            .map(|c| c.cached_size().map_or(0, |size| size.bytes()))
            .sum()
    }

    pub fn selected_child(&self) -> Option<&FileNode> {
        self.state.selected().and_then(|i| self.current_children().get(i))
    }

    fn selected_name(&self) -> Option<String> {
        self.selected_child().map(|c| c.name().to_string())
    }

    /// Select the child called `name`, falling back to the first entry
    fn select_name(&mut self, name: Option<String>) {
        let children = self.current_children();
        let position = name
            .and_then(|name| children.iter().position(|c| c.name() == name))
            .or(if children.is_empty() { None } else { Some(0) });
        self.state.select(position);
    }

    pub fn next(&mut self) {
        let len = self.current_children().len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) if i + 1 >= len => 0,
            Some(i) => i + 1,
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.current_children().len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    pub fn page_down(&mut self) {
        let len = self.current_children().len();
        if len == 0 {
            return;
        }
        let page_size = 10;
        let i = match self.state.selected() {
            Some(i) => (i + page_size).min(len - 1),
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn page_up(&mut self) {
        if self.current_children().is_empty() {
            return;
        }
        let page_size = 10;
        let i = match self.state.selected() {
            Some(i) => i.saturating_sub(page_size),
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn go_to_first(&mut self) {
        if !self.current_children().is_empty() {
            self.state.select(Some(0));
        }
    }

    pub fn go_to_last(&mut self) {
        let len = self.current_children().len();
        if len > 0 {
            self.state.select(Some(len - 1));
        }
    }

    /// Enter the selected directory
    pub fn enter_dir(&mut self) {
        let Some(index) = self.state.selected() else {
            return;
        };
        if !self.current_children().get(index).is_some_and(FileNode::is_dir) {
            return;
        }
        self.trail.push(index);
        self.prepare_current_view();
        self.select_name(None);
    }

    /// Go up one level, keeping the directory we came from selected
    pub fn go_up(&mut self) {
        let Some(index) = self.trail.pop() else {
            return;
        };
        let left = self.current_children().get(index).map(|c| c.name().to_string());
        self.sort_current_view();
        self.select_name(left);
    }

    /// Rebuild the current directory from disk
    pub fn refresh(&mut self) {
        let selected = self.selected_name();
        let Some(node) = self.root.descendant_mut(&self.trail) else {
            return;
        };
        let Some(path) = node.path().map(Path::to_path_buf) else {
            return;
        };

        match FileNode::new(&path) {
            Ok(mut fresh) => {
                let errors = fresh.scan_best_effort();
                fresh.size();
                *node = fresh;
                info!(path = %path.display(), errors, "refreshed");
                self.status_message = Some(if errors == 0 {
                    "Refresh complete!".to_string()
                } else {
                    format!("Refresh complete ({} entries unreadable)", errors)
                });
            }
            Err(e) => {
                warn!(error = %e, "refresh failed");
                self.status_message = Some(format!("Refresh failed: {}", e));
            }
        }

        self.sort_current_view();
        self.select_name(selected);
    }

    pub fn start_find(&mut self) {
        self.prompt = Some(Prompt::Find(String::new()));
    }

    /// Ask for confirmation before deleting the selected entry
    pub fn request_delete(&mut self) {
        if self.selected_child().is_some() {
            self.prompt = Some(Prompt::ConfirmDelete);
        }
    }

    pub fn prompt_push(&mut self, c: char) {
        if let Some(Prompt::Find(query)) = self.prompt.as_mut() {
            query.push(c);
        }
    }

    pub fn prompt_pop(&mut self) {
        if let Some(Prompt::Find(query)) = self.prompt.as_mut() {
            query.pop();
        }
    }

    pub fn cancel_prompt(&mut self) {
        self.prompt = None;
    }

    pub fn submit_prompt(&mut self) {
        match self.prompt.take() {
            Some(Prompt::Find(query)) if !query.is_empty() => self.find(&query),
            Some(Prompt::ConfirmDelete) => self.delete_selected(),
            _ => {}
        }
    }

    /// Jump to the first file named `name` below the current directory
    pub fn find(&mut self, name: &str) {
        let Some(node) = self.root.descendant_mut(&self.trail) else {
            return;
        };
        let Some(relative) = node.locate_best_effort(name) else {
            self.status_message = Some(format!("No file named {}", name));
            return;
        };

        if let Some((_, parents)) = relative.split_last() {
            self.trail.extend_from_slice(parents);
        }
        self.prepare_current_view();
        self.select_name(Some(name.to_string()));
        self.status_message = Some(format!("Found {}", name));
    }

    /// Delete the selected entry from disk and drop it from the view
    pub fn delete_selected(&mut self) {
        let Some(index) = self.state.selected() else {
            return;
        };
        let Some(node) = self.root.descendant_mut(&self.trail) else {
            return;
        };
        let Some(child) = node.children().and_then(|c| c.get(index)) else {
            return;
        };

        let name = child.name().to_string();
        match child.delete_recursive() {
            Ok(()) => {
                node.remove_child(index);
                self.status_message = Some(format!("Deleted {}", name));
            }
            Err(e) => {
                warn!(error = %e, "delete failed");
                self.status_message = Some(format!("Delete failed: {}", e));
                return;
            }
        }

        let len = self.current_children().len();
        self.state.select(if len == 0 { None } else { Some(index.min(len - 1)) });
    }
}
