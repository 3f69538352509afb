use crate::{Config, Control, DrumPad, MidiMonitor, Session};
use eframe::egui;
use std::time::Duration;
use tracing::error;

pub struct MidiLogApp {
    session: Session,
    monitor: Option<MidiMonitor>,
    tick_interval: Duration,
    volume: f64,
    pan: f64,
    error_message: Option<String>,
}

impl MidiLogApp {
    pub fn new(config: &Config, session: Session) -> Self {
        let mut app = Self {
            session,
            monitor: None,
            tick_interval: Duration::from_millis(config.tick_interval_ms.max(1)),
            volume: 0.0,
            pan: 0.0,
            error_message: None,
        };

        if let Some(filter) = &config.midi_input {
            match MidiMonitor::connect(filter) {
                Ok(monitor) => app.monitor = Some(monitor),
                Err(e) => {
                    error!("{}", e);
                    app.error_message = Some(e.to_string());
                }
            }
        }

        app
    }

    fn process_frame(&mut self) {
        let external = match &mut self.monitor {
            Some(monitor) => monitor.drain(),
            None => Vec::new(),
        };
        self.session.advance(external);
    }

    fn controls(&mut self, ui: &mut egui::Ui) {
        for pad in DrumPad::ALL {
            let button =
                egui::Button::new(pad.label()).min_size(egui::vec2(ui.available_width(), 20.0));
            if ui.add(button).clicked() {
                self.session.trigger_pad(pad);
            }
        }

        ui.add_space(20.0);

        for (control, position) in [
            (Control::Volume, &mut self.volume),
            (Control::Pan, &mut self.pan),
        ] {
            ui.label(control.label());
            let slider = egui::Slider::new(position, control.range()).step_by(1.0);
            if ui.add(slider).changed() {
                self.session.control_changed(control, *position);
            }
        }

        ui.add_space(20.0);

        if let Some(monitor) = &self.monitor {
            ui.label(format!("Input: {}", monitor.port_name()));
        }
        ui.label(format!("Pending note-offs: {}", self.session.pending()));
        if ui.button("Clear log").clicked() {
            self.session.clear();
        }
    }
}

impl eframe::App for MidiLogApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_frame();

        if let Some(ref error) = self.error_message {
            egui::TopBottomPanel::top("error").show(ctx, |ui| {
                ui.colored_label(egui::Color32::RED, error);
            });
        }

        egui::SidePanel::left("controls")
            .min_width(300.0)
            .show(ctx, |ui| {
                self.controls(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .stick_to_bottom(true)
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    for line in self.session.lines() {
                        ui.monospace(line);
                    }
                });
        });

        ctx.request_repaint_after(self.tick_interval);
    }
}
