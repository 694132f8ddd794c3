use eframe::egui::Ui;
use egui_plot::{Legend, Plot, PlotPoints, Points};

use super::to_color32;
use sleepscope::view::ScatterSpec;

// ---------------------------------------------------------------------------
// Scatter plot (central panel, Graph tab)
// ---------------------------------------------------------------------------

/// Render a scatter spec, one point series per category.
pub fn scatter_plot(ui: &mut Ui, spec: &ScatterSpec) {
    Plot::new("scatter_plot")
        .legend(Legend::default())
        .x_axis_label(&spec.x_label)
        .y_axis_label(&spec.y_label)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for trace in &spec.traces {
                let points: PlotPoints = trace.points.iter().map(|p| [p.x, p.y]).collect();
                plot_ui.points(
                    Points::new(points)
                        .name(&trace.category)
                        .color(to_color32(trace.color))
                        .radius(3.5),
                );
            }
        });
}
