// ==========================================
// WCM 设备台账 - SVG 导出
// ==========================================
// 每个单元格画成四个三角形（上 / 右 / 下 / 左）
// 左侧为部件表头（序号 + 徽标 + 编号 + 名称）
// ==========================================

use crate::engine::ledger_grid::{LedgerGrid, LedgerRow, Quadrant};
use std::fmt::Write;

const CELL: u32 = 16;
const HEADER_WIDTH: u32 = 260;
const TITLE_HEIGHT: u32 = 28;
const WEEK_HEADER_HEIGHT: u32 = 18;
const GRID_STROKE: &str = "#D1D5DB";

/// 渲染为独立 SVG 文档
pub fn render_svg(grid: &LedgerGrid) -> String {
    let width = HEADER_WIDTH + CELL * grid.weeks.len() as u32;
    let top = TITLE_HEIGHT + WEEK_HEADER_HEIGHT;
    let height = top + CELL * grid.rows.len() as u32;

    let mut out = String::new();
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="sans-serif" font-size="10">"#,
        w = width,
        h = height
    );
    let _ = writeln!(
        out,
        r#"<text x="4" y="18" font-size="14" font-weight="bold">{}</text>"#,
        escape(&grid.title)
    );

    // 周号表头（选中列加粗）
    for (i, week) in grid.weeks.iter().enumerate() {
        let x = HEADER_WIDTH + CELL * i as u32 + CELL / 2;
        let weight = if grid.selected_week == Some(*week) { "bold" } else { "normal" };
        let _ = writeln!(
            out,
            r#"<text x="{}" y="{}" text-anchor="middle" font-weight="{}">{}</text>"#,
            x,
            TITLE_HEIGHT + WEEK_HEADER_HEIGHT - 5,
            weight,
            week
        );
    }

    for (r, row) in grid.rows.iter().enumerate() {
        let y = top + CELL * r as u32;
        write_row_header(&mut out, row, y);
        for (c, cell) in row.cells.iter().enumerate() {
            let x = HEADER_WIDTH + CELL * c as u32;
            let _ = writeln!(out, r#"<g><title>{}</title>"#, escape(&cell.tooltip));
            for quadrant in Quadrant::ALL {
                let _ = writeln!(
                    out,
                    r#"<polygon points="{}" fill="{}" stroke="{}" stroke-width="0.5"/>"#,
                    triangle(quadrant, x, y),
                    cell.flags.fill(quadrant),
                    GRID_STROKE
                );
            }
            out.push_str("</g>\n");
        }
    }

    out.push_str("</svg>\n");
    out
}

fn write_row_header(out: &mut String, row: &LedgerRow, y: u32) {
    let text_y = y + CELL - 4;
    let _ = writeln!(out, r#"<text x="4" y="{}">{}</text>"#, text_y, row.no);
    let _ = writeln!(
        out,
        r#"<rect x="28" y="{}" width="14" height="12" rx="2" fill="{}"/>"#,
        y + 2,
        row.badge.color
    );
    let _ = writeln!(
        out,
        r##"<text x="35" y="{}" text-anchor="middle" fill="#FFFFFF" font-weight="bold">{}</text>"##,
        text_y,
        escape(&row.badge.label)
    );
    let _ = writeln!(
        out,
        r#"<text x="48" y="{}">{} {}</text>"#,
        text_y,
        escape(&row.part_number),
        escape(&row.part_name)
    );
}

/// 单元格内的三角形顶点（以单元格中心为公共顶点）
fn triangle(quadrant: Quadrant, x: u32, y: u32) -> String {
    let (x0, y0) = (x as f64, y as f64);
    let s = CELL as f64;
    let (cx, cy) = (x0 + s / 2.0, y0 + s / 2.0);
    let points = match quadrant {
        Quadrant::Top => [(x0, y0), (x0 + s, y0), (cx, cy)],
        Quadrant::Right => [(x0 + s, y0), (x0 + s, y0 + s), (cx, cy)],
        Quadrant::Bottom => [(x0 + s, y0 + s), (x0, y0 + s), (cx, cy)],
        Quadrant::Left => [(x0, y0 + s), (x0, y0), (cx, cy)],
    };
    points
        .iter()
        .map(|(px, py)| format!("{},{}", px, py))
        .collect::<Vec<_>>()
        .join(" ")
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
