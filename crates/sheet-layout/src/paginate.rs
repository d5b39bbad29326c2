//! Splitting groups into fixed-capacity pages and placing cells.

use tracing::debug;

use crate::geometry::PageGeometry;
use crate::group::Group;
use crate::packer::LayoutPlan;

/// A cell rectangle in millimetres, origin at the top-left of the page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl CellRect {
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// One item positioned on a page.
#[derive(Debug, Clone)]
pub struct Placement<'a, T> {
    pub item: &'a T,
    /// Position of the item within its page.
    pub slot: usize,
    pub column: u32,
    pub row: u32,
    pub rect: CellRect,
}

/// Everything needed to draw one physical page.
#[derive(Debug, Clone)]
pub struct PageRun<'a, T> {
    pub group: &'a Group<T>,
    pub group_index: usize,
    /// 0 for the first page of a group.
    pub page_in_group: usize,
    /// Whether a new sheet must be started before drawing (false only for
    /// the very first page of the document).
    pub starts_new_sheet: bool,
    pub plan: &'a LayoutPlan,
    pub placements: Vec<Placement<'a, T>>,
}

impl<T> PageRun<'_, T> {
    /// Pages after the first of a group carry a "continued" header.
    pub fn is_continuation(&self) -> bool {
        self.page_in_group > 0
    }
}

/// Lay every group out page by page.
///
/// `plan_for` is asked once per group (return the same plan every time for
/// a single-plan export). Each group is cut into chunks of
/// `plan.items_per_page` and `render_page` receives one [`PageRun`] per
/// chunk, in order. Returns the number of pages emitted.
pub fn paginate<T, P, R, E>(
    groups: &[Group<T>],
    geometry: &PageGeometry,
    mut plan_for: P,
    mut render_page: R,
) -> Result<usize, E>
where
    P: FnMut(&Group<T>) -> LayoutPlan,
    R: FnMut(PageRun<'_, T>) -> Result<(), E>,
{
    let mut pages = 0usize;

    for (group_index, group) in groups.iter().enumerate() {
        if group.is_empty() {
            continue;
        }

        let plan = plan_for(group);
        let per_page = (plan.items_per_page as usize).max(1);
        debug!(
            group = %group.key,
            items = group.len(),
            per_page,
            "Paginating group"
        );

        for (page_in_group, chunk) in group.items.chunks(per_page).enumerate() {
            let placements = chunk
                .iter()
                .enumerate()
                .map(|(slot, item)| place(item, slot, &plan, geometry))
                .collect();

            render_page(PageRun {
                group,
                group_index,
                page_in_group,
                starts_new_sheet: pages > 0,
                plan: &plan,
                placements,
            })?;
            pages += 1;
        }
    }

    Ok(pages)
}

fn place<'a, T>(item: &'a T, slot: usize, plan: &LayoutPlan, geometry: &PageGeometry) -> Placement<'a, T> {
    let columns = plan.columns.max(1) as usize;
    let column = (slot % columns) as u32;
    let row = (slot / columns) as u32;
    let (origin_x, origin_y) = geometry.origin();

    Placement {
        item,
        slot,
        column,
        row,
        rect: CellRect {
            x: origin_x + column as f32 * (plan.cell_width + geometry.gap_x),
            y: origin_y + row as f32 * (plan.cell_height + geometry.gap_y),
            width: plan.cell_width,
            height: plan.cell_height,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::group_by_key;
    use crate::packer::{CellShape, compute_layout};
    use std::convert::Infallible;

    fn plan_with_capacity(columns: u32, rows: u32) -> LayoutPlan {
        LayoutPlan {
            columns,
            cell_width: 28.0,
            cell_height: 40.0,
            rows_per_page: rows,
            items_per_page: columns * rows,
            shape: CellShape::SquareWithCaption,
            fallback: false,
        }
    }

    fn groups(sizes: &[(&str, usize)]) -> Vec<Group<(String, usize)>> {
        let items = sizes
            .iter()
            .flat_map(|(key, n)| (0..*n).map(move |i| (key.to_string(), i)));
        group_by_key(items, |(k, _)| k.as_str())
    }

    /// (group key, page in group, new sheet, item indexes)
    fn collect(
        groups: &[Group<(String, usize)>],
        plan: LayoutPlan,
    ) -> Vec<(String, usize, bool, Vec<usize>)> {
        let mut out = Vec::new();
        paginate(groups, &PageGeometry::qr_a4(), |_| plan, |run| {
            out.push((
                run.group.key.clone(),
                run.page_in_group,
                run.starts_new_sheet,
                run.placements.iter().map(|p| p.item.1).collect(),
            ));
            Ok::<(), Infallible>(())
        })
        .unwrap();
        out
    }

    #[test]
    fn forty_items_at_33_per_page_make_two_pages() {
        let pages = collect(&groups(&[("07-1", 40)]), plan_with_capacity(3, 11));
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].3.len(), 33);
        assert_eq!(pages[1].3.len(), 7);
        assert_eq!(pages[1].1, 1);
    }

    #[test]
    fn pages_reproduce_each_group_exactly() {
        let gs = groups(&[("a", 5), ("b", 36), ("c", 37), ("d", 80)]);
        let pages = collect(&gs, plan_with_capacity(6, 6));

        for g in &gs {
            let emitted: Vec<usize> = pages
                .iter()
                .filter(|p| p.0 == g.key)
                .flat_map(|p| p.3.clone())
                .collect();
            let expected: Vec<usize> = g.items.iter().map(|i| i.1).collect();
            assert_eq!(emitted, expected, "group {}", g.key);
        }
        assert_eq!(pages.len(), 1 + 1 + 2 + 3);
    }

    #[test]
    fn only_first_page_skips_new_sheet() {
        let pages = collect(&groups(&[("a", 3), ("b", 40)]), plan_with_capacity(6, 6));
        let flags: Vec<bool> = pages.iter().map(|p| p.2).collect();
        assert_eq!(flags, vec![false, true, true]);
    }

    #[test]
    fn cells_are_placed_row_major_from_origin() {
        let gs = groups(&[("a", 8)]);
        let geometry = PageGeometry::qr_a4();
        let plan = plan_with_capacity(6, 6);
        let mut rects = Vec::new();
        paginate(&gs, &geometry, |_| plan, |run| {
            rects.extend(run.placements.iter().map(|p| (p.column, p.row, p.rect)));
            Ok::<(), Infallible>(())
        })
        .unwrap();

        assert_eq!((rects[0].0, rects[0].1), (0, 0));
        assert_eq!(rects[0].2.x, 8.0);
        assert_eq!(rects[0].2.y, 20.0);
        assert_eq!((rects[7].0, rects[7].1), (1, 1));
        assert_eq!(rects[7].2.x, 8.0 + 31.0);
        assert_eq!(rects[7].2.y, 20.0 + 44.0);
    }

    #[test]
    fn per_group_plans_are_requested_once_each() {
        let gs = groups(&[("a", 3), ("b", 3)]);
        let mut asked = Vec::new();
        let geometry = PageGeometry::barcode_a4();
        paginate(
            &gs,
            &geometry,
            |g| {
                asked.push(g.key.clone());
                compute_layout(33, &geometry, CellShape::wide(0.3))
            },
            |_| Ok::<(), Infallible>(()),
        )
        .unwrap();
        assert_eq!(asked, vec!["a", "b"]);
    }

    #[test]
    fn render_errors_stop_pagination() {
        let gs = groups(&[("a", 3), ("b", 3)]);
        let mut seen = 0;
        let result = paginate(&gs, &PageGeometry::qr_a4(), |_| plan_with_capacity(3, 1), |_| {
            seen += 1;
            if seen == 2 { Err("embed failed") } else { Ok(()) }
        });
        assert_eq!(result, Err("embed failed"));
        assert_eq!(seen, 2);
    }

    #[test]
    fn continuation_flag_follows_page_index() {
        let gs = groups(&[("a", 7)]);
        let mut flags = Vec::new();
        paginate(&gs, &PageGeometry::qr_a4(), |_| plan_with_capacity(3, 1), |run| {
            flags.push(run.is_continuation());
            Ok::<(), Infallible>(())
        })
        .unwrap();
        assert_eq!(flags, vec![false, true, true]);
    }
}
