use eframe::egui::Color32;
use sleepscope::color::Rgb8;

pub mod panels;
pub mod plot;
pub mod table;

pub fn to_color32(c: Rgb8) -> Color32 {
    Color32::from_rgb(c.red, c.green, c.blue)
}
