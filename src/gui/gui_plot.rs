use crate::Kinetics::mechanisms::SPECIES;
use crate::Kinetics::trajectory::Trajectory;
use eframe::egui;
use eframe::egui::Color32;
use egui_plot::{Corner, Legend, Line, LineStyle, Plot, PlotPoints};

/// drawing style of one species curve
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesStyle {
    pub name: &'static str,
    pub color: Color32,
    pub width: f32,
    pub dashed: bool,
}

/// A red, B blue dashed, C cyan, D orange
pub const SERIES_STYLES: [SeriesStyle; 4] = [
    SeriesStyle {
        name: SPECIES[0],
        color: Color32::RED,
        width: 3.0,
        dashed: false,
    },
    SeriesStyle {
        name: SPECIES[1],
        color: Color32::BLUE,
        width: 3.0,
        dashed: true,
    },
    SeriesStyle {
        name: SPECIES[2],
        color: Color32::from_rgb(0, 255, 255),
        width: 3.0,
        dashed: false,
    },
    SeriesStyle {
        name: SPECIES[3],
        color: Color32::from_rgb(255, 165, 0),
        width: 3.0,
        dashed: false,
    },
];

pub const X_LABEL: &str = "Time (s)";
pub const Y_LABEL: &str = "Concentration (M)";

/// Concentration vs time chart of the four species of a trajectory
pub struct ConcentrationPlot {
    pub height: f32,
    pub width: f32,
}

impl Default for ConcentrationPlot {
    fn default() -> Self {
        Self {
            height: 500.0,
            width: 700.0,
        }
    }
}

impl ConcentrationPlot {
    pub fn show(&self, ui: &mut egui::Ui, trajectory: &Trajectory) {
        Plot::new("concentrations")
            .width(self.width)
            .height(self.height)
            .x_axis_label(X_LABEL)
            .y_axis_label(Y_LABEL)
            .legend(Legend::default().position(Corner::RightTop))
            .show(ui, |plot_ui| {
                for (col, style) in SERIES_STYLES.iter().enumerate() {
                    let points: PlotPoints = trajectory.series(col).into_iter().collect();
                    let line = Line::new(style.name, points)
                        .color(style.color)
                        .width(style.width);
                    if style.dashed {
                        plot_ui.line(line.style(LineStyle::Dashed { length: 10.0 }));
                    } else {
                        plot_ui.line(line);
                    }
                }
            });
    }
}
