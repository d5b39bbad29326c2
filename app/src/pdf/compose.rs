//! Drawing grouped codes onto pages.

use code_render::text::first_line;
use code_render::{RenderedItem, try_aspect_ratio};
use sheet_layout::packer::{DEFAULT_ASPECT_RATIO, WIDE_CAPTION_GAP, WIDE_CAPTION_HEIGHT};
use sheet_layout::{
    CellShape, Group, LayoutPlan, PageGeometry, PageRun, Placement, caption_tier, compute_layout,
    paginate,
};
use tracing::{debug, info, warn};

use super::canvas::{Align, PageCanvas};
use crate::error::ExportError;

const HEADER_RULE_GRAY: f32 = 200.0 / 255.0;
const SQUARE_BORDER_GRAY: f32 = 210.0 / 255.0;
const WIDE_BORDER_GRAY: f32 = 220.0 / 255.0;

const WIDE_NAME_PT: f32 = 10.0;
const WIDE_CLASS_PT: f32 = 9.0;
const WIDE_NAME_BASELINE: f32 = 4.0;
const WIDE_CLASS_BASELINE: f32 = 9.0;

/// Localised words used in page headers and captions.
#[derive(Debug, Clone)]
pub struct SheetLabels {
    pub section: String,
    pub continued: String,
}

impl Default for SheetLabels {
    fn default() -> Self {
        Self {
            section: "Class".into(),
            continued: "(continued)".into(),
        }
    }
}

impl SheetLabels {
    pub fn header(&self, key: &str, continued: bool) -> String {
        if continued {
            format!("{}: {} {}", self.section, key, self.continued)
        } else {
            format!("{}: {}", self.section, key)
        }
    }

    fn class_caption(&self, class_label: &str) -> String {
        format!("{}: {}", self.section, class_label.replace('/', "-"))
    }
}

/// Lay out QR codes with one plan for the whole export. Returns the number
/// of pages drawn.
pub fn compose_qr_pages<C: PageCanvas>(
    canvas: &mut C,
    groups: &[Group<RenderedItem>],
    geometry: &PageGeometry,
    quota: u32,
    labels: &SheetLabels,
) -> Result<usize, ExportError> {
    let plan = compute_layout(quota, geometry, CellShape::SquareWithCaption);
    info!(
        columns = plan.columns,
        cell = plan.cell_width,
        per_page = plan.items_per_page,
        fallback = plan.fallback,
        "QR layout chosen"
    );

    paginate(
        groups,
        geometry,
        |_| plan,
        |run| draw_page(canvas, &run, geometry, labels),
    )
}

/// Lay out barcodes with a plan per group, derived from the aspect ratio of
/// the group's first code.
pub fn compose_barcode_pages<C: PageCanvas>(
    canvas: &mut C,
    groups: &[Group<RenderedItem>],
    geometry: &PageGeometry,
    quota: u32,
    labels: &SheetLabels,
) -> Result<usize, ExportError> {
    paginate(
        groups,
        geometry,
        |group| {
            let ratio = group
                .first()
                .and_then(|item| try_aspect_ratio(&item.bitmap))
                .unwrap_or_else(|| {
                    warn!(group = %group.key, "Could not read barcode size, using default ratio");
                    DEFAULT_ASPECT_RATIO
                });
            let plan = compute_layout(quota, geometry, CellShape::wide(ratio));
            info!(
                group = %group.key,
                ratio,
                columns = plan.columns,
                cell = plan.cell_width,
                per_page = plan.items_per_page,
                "Barcode layout chosen"
            );
            plan
        },
        |run| draw_page(canvas, &run, geometry, labels),
    )
}

fn draw_page<C: PageCanvas>(
    canvas: &mut C,
    run: &PageRun<'_, RenderedItem>,
    geometry: &PageGeometry,
    labels: &SheetLabels,
) -> Result<(), ExportError> {
    if run.starts_new_sheet {
        canvas.add_page();
    }
    debug!(
        group = %run.group.key,
        page = run.page_in_group,
        items = run.placements.len(),
        "Drawing page"
    );

    let header = labels.header(&run.group.key, run.is_continuation());
    canvas.text(
        &header,
        geometry.header_font_pt,
        geometry.margin,
        geometry.header_baseline(),
        Align::Left,
    );
    let rule_y = geometry.header_rule_y();
    canvas.line(
        (geometry.margin, rule_y),
        (geometry.page_width - geometry.margin, rule_y),
        HEADER_RULE_GRAY,
    );

    for placement in &run.placements {
        match run.plan.shape {
            CellShape::SquareWithCaption => {
                draw_square_cell(canvas, placement, run.plan, geometry)?
            }
            CellShape::WideWithCaption { .. } => {
                draw_wide_cell(canvas, placement, run.plan, geometry, labels)?
            }
        }
    }
    Ok(())
}

/// Code on top, name and identifier right-aligned underneath.
fn draw_square_cell<C: PageCanvas>(
    canvas: &mut C,
    placement: &Placement<'_, RenderedItem>,
    plan: &LayoutPlan,
    geometry: &PageGeometry,
) -> Result<(), ExportError> {
    let item = placement.item;
    let rect = placement.rect;
    let pad = geometry.cell_padding;
    let size = plan.cell_width;

    canvas.rect(rect, SQUARE_BORDER_GRAY);
    embed(canvas, item, rect.x + pad, rect.y + pad, plan.image_width(geometry))?;

    let tier = caption_tier(size);
    let max_width = size - pad * 2.0;
    let right = rect.x + size - pad;

    let name = first_line(&item.record.name, max_width, |s| canvas.text_width(s, tier.name_pt));
    canvas.text(&name, tier.name_pt, right, rect.y + size + tier.name_baseline, Align::Right);

    let id = first_line(&item.record.id, max_width, |s| canvas.text_width(s, tier.id_pt));
    canvas.text(&id, tier.id_pt, right, rect.y + size + tier.id_baseline, Align::Right);
    Ok(())
}

/// Name and class caption right-aligned on top, barcode centred below.
fn draw_wide_cell<C: PageCanvas>(
    canvas: &mut C,
    placement: &Placement<'_, RenderedItem>,
    plan: &LayoutPlan,
    geometry: &PageGeometry,
    labels: &SheetLabels,
) -> Result<(), ExportError> {
    let item = placement.item;
    let rect = placement.rect;
    let pad = geometry.cell_padding;

    canvas.rect(rect, WIDE_BORDER_GRAY);

    let max_width = rect.width - pad * 2.0;
    let right = rect.right() - pad;

    let name = first_line(&item.record.name, max_width, |s| canvas.text_width(s, WIDE_NAME_PT));
    canvas.text(&name, WIDE_NAME_PT, right, rect.y + pad + WIDE_NAME_BASELINE, Align::Right);

    let class = labels.class_caption(&item.record.class_label);
    let class = first_line(&class, max_width, |s| canvas.text_width(s, WIDE_CLASS_PT));
    canvas.text(&class, WIDE_CLASS_PT, right, rect.y + pad + WIDE_CLASS_BASELINE, Align::Right);

    let width = plan.image_width(geometry);
    let x = rect.x + (rect.width - width) / 2.0;
    let top = rect.y + pad + WIDE_CAPTION_HEIGHT + WIDE_CAPTION_GAP;
    embed(canvas, item, x, top, width)
}

fn embed<C: PageCanvas>(
    canvas: &mut C,
    item: &RenderedItem,
    x: f32,
    top: f32,
    width: f32,
) -> Result<(), ExportError> {
    canvas
        .image(&item.bitmap, x, top, width)
        .map_err(|reason| ExportError::Embed {
            id: item.record.id.clone(),
            reason,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use code_render::{Bitmap, CodeKind, CodeRenderer};
    use roster::IdentityRecord;
    use sheet_layout::{CellRect, group_by_key};

    #[derive(Debug, Clone, PartialEq)]
    enum Op {
        Page,
        Text { text: String, pt: f32, x: f32, baseline: f32, align: Align },
        Line,
        Rect(CellRect),
        Image { x: f32, top: f32, width: f32 },
    }

    #[derive(Default)]
    struct Recorder {
        ops: Vec<Op>,
        fail_images: bool,
    }

    impl Recorder {
        fn texts(&self) -> Vec<&str> {
            self.ops
                .iter()
                .filter_map(|op| match op {
                    Op::Text { text, .. } => Some(text.as_str()),
                    _ => None,
                })
                .collect()
        }

        fn count(&self, pred: impl Fn(&Op) -> bool) -> usize {
            self.ops.iter().filter(|op| pred(op)).count()
        }
    }

    impl PageCanvas for Recorder {
        fn add_page(&mut self) {
            self.ops.push(Op::Page);
        }

        fn text_width(&self, text: &str, pt: f32) -> f32 {
            text.chars().count() as f32 * pt * 0.2
        }

        fn text(&mut self, text: &str, pt: f32, x: f32, baseline: f32, align: Align) {
            self.ops.push(Op::Text {
                text: text.to_string(),
                pt,
                x,
                baseline,
                align,
            });
        }

        fn line(&mut self, _from: (f32, f32), _to: (f32, f32), _gray: f32) {
            self.ops.push(Op::Line);
        }

        fn rect(&mut self, rect: CellRect, _gray: f32) {
            self.ops.push(Op::Rect(rect));
        }

        fn image(&mut self, _bitmap: &Bitmap, x: f32, top: f32, width: f32) -> Result<(), String> {
            if self.fail_images {
                return Err("corrupt image".into());
            }
            self.ops.push(Op::Image { x, top, width });
            Ok(())
        }
    }

    fn items(kind: CodeKind, class_counts: &[(&str, usize)]) -> Vec<RenderedItem> {
        let renderer = CodeRenderer::new(kind);
        class_counts
            .iter()
            .flat_map(|(class, n)| (0..*n).map(move |i| (class.to_string(), i)))
            .map(|(class, i)| {
                let record = IdentityRecord {
                    id: format!("{:04}", i + 1),
                    name: format!("Student {}", i + 1),
                    class_label: class,
                };
                renderer.render(&record).unwrap()
            })
            .collect()
    }

    fn groups(items: Vec<RenderedItem>) -> Vec<Group<RenderedItem>> {
        group_by_key(items, |item| item.folder_key.as_str())
    }

    #[test]
    fn header_wording() {
        let labels = SheetLabels::default();
        assert_eq!(labels.header("07-1", false), "Class: 07-1");
        assert_eq!(labels.header("07-1", true), "Class: 07-1 (continued)");
        assert_eq!(labels.class_caption("07/1"), "Class: 07-1");
    }

    #[test]
    fn qr_groups_paginate_by_quota() {
        let groups = groups(items(CodeKind::Qr, &[("07/1", 40), ("07/2", 3)]));
        let mut canvas = Recorder::default();
        let pages = compose_qr_pages(
            &mut canvas,
            &groups,
            &PageGeometry::qr_a4(),
            33,
            &SheetLabels::default(),
        )
        .unwrap();

        // 36 cells per page: 07-1 needs two pages, 07-2 one
        assert_eq!(pages, 3);
        assert_eq!(canvas.count(|op| *op == Op::Page), 2);
        assert_eq!(canvas.count(|op| matches!(op, Op::Image { .. })), 43);
        assert_eq!(canvas.count(|op| matches!(op, Op::Rect(_))), 43);

        let headers: Vec<&str> = canvas
            .texts()
            .into_iter()
            .filter(|t| t.starts_with("Class:"))
            .collect();
        assert_eq!(
            headers,
            vec!["Class: 07-1", "Class: 07-1 (continued)", "Class: 07-2"]
        );
    }

    #[test]
    fn square_captions_are_right_aligned_below_the_code() {
        let groups = groups(items(CodeKind::Qr, &[("A", 1)]));
        let geometry = PageGeometry::qr_a4();
        let mut canvas = Recorder::default();
        compose_qr_pages(&mut canvas, &groups, &geometry, 33, &SheetLabels::default()).unwrap();

        let plan = compute_layout(33, &geometry, CellShape::SquareWithCaption);
        let tier = caption_tier(plan.cell_width);
        let (x0, y0) = geometry.origin();

        let name = canvas
            .ops
            .iter()
            .find(|op| matches!(op, Op::Text { text, .. } if text == "Student 1"))
            .cloned()
            .unwrap();
        assert_eq!(
            name,
            Op::Text {
                text: "Student 1".into(),
                pt: tier.name_pt,
                x: x0 + plan.cell_width - geometry.cell_padding,
                baseline: y0 + plan.cell_width + tier.name_baseline,
                align: Align::Right,
            }
        );
        assert!(canvas.texts().contains(&"0001"));
        assert!(canvas.ops.contains(&Op::Image {
            x: x0 + 2.0,
            top: y0 + 2.0,
            width: plan.cell_width - 4.0,
        }));
    }

    #[test]
    fn long_names_keep_only_the_first_line() {
        let mut list = items(CodeKind::Qr, &[("A", 1)]);
        list[0].record.name = "Abdulrahman Mohammed Abdullah Al Hashimi".into();
        let mut canvas = Recorder::default();
        compose_qr_pages(
            &mut canvas,
            &groups(list),
            &PageGeometry::qr_a4(),
            33,
            &SheetLabels::default(),
        )
        .unwrap();

        let name = canvas
            .texts()
            .into_iter()
            .find(|t| t.starts_with("Abdulrahman"))
            .unwrap()
            .to_string();
        assert!(name.len() < "Abdulrahman Mohammed Abdullah Al Hashimi".len());
    }

    #[test]
    fn barcode_cells_put_captions_above_the_code() {
        let groups = groups(items(CodeKind::Barcode, &[("08/3", 2)]));
        let geometry = PageGeometry::barcode_a4();
        let labels = SheetLabels {
            section: "Grade".into(),
            continued: "(cont.)".into(),
        };
        let mut canvas = Recorder::default();
        let pages = compose_barcode_pages(&mut canvas, &groups, &geometry, 33, &labels).unwrap();
        assert_eq!(pages, 1);

        let texts = canvas.texts();
        assert_eq!(texts[0], "Grade: 08-3");
        assert_eq!(texts.iter().filter(|t| **t == "Grade: 08-3").count(), 3);

        let (x0, y0) = geometry.origin();
        let first_image = canvas
            .ops
            .iter()
            .find_map(|op| match op {
                Op::Image { x, top, width } => Some((*x, *top, *width)),
                _ => None,
            })
            .unwrap();
        assert_eq!(first_image.1, y0 + 2.0 + 12.0);
        assert!(first_image.0 >= x0);
        assert!(first_image.2 > 0.0);
    }

    #[test]
    fn embed_failure_aborts_with_record_id() {
        let groups = groups(items(CodeKind::Qr, &[("A", 2)]));
        let mut canvas = Recorder {
            fail_images: true,
            ..Recorder::default()
        };
        let err = compose_qr_pages(
            &mut canvas,
            &groups,
            &PageGeometry::qr_a4(),
            33,
            &SheetLabels::default(),
        )
        .unwrap_err();
        match err {
            ExportError::Embed { id, .. } => assert_eq!(id, "0001"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
