use crate::registry::ShortcutEntry;

/// Resolves icon references to drawable handles. Providers may resolve
/// asynchronously: `request` returns `None` until the image is ready, and the
/// owner later hands the result to [`IconGridView::attach_icon`].
pub trait ImageProvider {
    type Handle;

    fn request(&mut self, icon_ref: &str) -> Option<Self::Handle>;
}

pub type LaunchFn = Box<dyn Fn(&str)>;

pub struct GridCell<H> {
    pub row: usize,
    pub col: usize,
    pub entry: ShortcutEntry,
    /// `None` means the placeholder icon is drawn.
    pub icon: Option<H>,
}

pub struct IconGridView<H> {
    cells: Vec<GridCell<H>>,
    columns: usize,
    launch: Option<LaunchFn>,
}

impl<H> Default for IconGridView<H> {
    fn default() -> Self {
        Self {
            cells: Vec::new(),
            columns: 1,
            launch: None,
        }
    }
}

impl<H: Clone> IconGridView<H> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cells(&self) -> &[GridCell<H>] {
        &self.cells
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    #[cfg(test)]
    pub fn rows(&self) -> usize {
        self.cells.len().div_ceil(self.columns)
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Replaces the grid contents with `entries`, laid out row-major.
    pub fn populate<P>(
        &mut self,
        entries: &[ShortcutEntry],
        columns: usize,
        images: &mut P,
        launch: LaunchFn,
    ) where
        P: ImageProvider<Handle = H>,
    {
        self.clear();
        self.columns = columns.max(1);
        self.cells = entries
            .iter()
            .enumerate()
            .map(|(index, entry)| GridCell {
                row: index / self.columns,
                col: index % self.columns,
                entry: entry.clone(),
                icon: images.request(&entry.icon),
            })
            .collect();
        self.launch = Some(launch);
    }

    /// Fills in an icon that resolved after `populate`.
    pub fn attach_icon(&mut self, icon_ref: &str, handle: &H) {
        for cell in self.cells.iter_mut().filter(|c| c.entry.icon == icon_ref) {
            cell.icon = Some(handle.clone());
        }
    }

    /// Launches the entry at `index`. Returns whether an entry was there.
    pub fn activate(&self, index: usize) -> bool {
        let (Some(cell), Some(launch)) = (self.cells.get(index), self.launch.as_ref()) else {
            return false;
        };
        launch(&cell.entry.target);
        true
    }

    pub fn clear(&mut self) {
        self.cells.clear();
        self.launch = None;
    }
}
