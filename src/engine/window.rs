use super::store::CellStore;
use crate::Pos2;

/// A read-only rectangular view over the live cells, `br` is exclusive
pub struct Viewport<'a> {
    tl: Pos2,
    br: Pos2,
    store: &'a CellStore,
}
impl<'a> Viewport<'a> {
    pub fn new(store: &'a CellStore, top_left: Pos2, bottom_right: Pos2) -> Self {
        Self {
            tl: top_left,
            br: bottom_right,
            store,
        }
    }

    /// Live cells inside the view, row-major
    pub fn iter(&self) -> impl Iterator<Item = Pos2> + '_ {
        let rx = self.tl.x..self.br.x;
        (self.tl.y..self.br.y).flat_map(move |y| {
            let rx = rx.clone();
            self.store
                .row(y)
                .filter(move |x| rx.contains(x))
                .map(move |x| Pos2 { x, y })
        })
    }
}

impl std::fmt::Display for Viewport<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut last = self.tl - Pos2 { x: 1, y: 0 };
        for alive in self.iter() {
            // determine the number of lines to print
            let lines = alive.y - last.y;
            // determine the number of padding spaces to print
            let padding = match lines {
                0 => alive.x - last.x - 1,
                _ => alive.x - self.tl.x,
            };
            write!(
                f,
                "{0:\n<1$}{0: <2$}█",
                "", lines as usize, padding as usize
            )?;
            last = alive;
        }
        Ok(())
    }
}
