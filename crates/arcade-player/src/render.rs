//! wgpu presentation of the runtime's draw list
//!
//! The retained [`DrawCmd`] list is replayed through an egui painter every
//! redraw. Commands are in device pixels; egui works in points, so every
//! coordinate is divided by the runtime's pixel ratio.

use std::sync::Arc;

use arcade_core::{ArcadeError, Color, Rect, Result};
use arcade_runtime::{DrawCmd, TextAlign};
use winit::window::Window;

/// wgpu device, queue, and window surface
pub struct RenderContext {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub size: winit::dpi::PhysicalSize<u32>,
}

impl RenderContext {
    pub async fn new(window: Arc<Window>) -> Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .map_err(|e| ArcadeError::RuntimeError(format!("failed to create surface: {e}")))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| ArcadeError::RuntimeError("no suitable GPU adapter".into()))?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Arcade Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await
            .map_err(|e| ArcadeError::RuntimeError(format!("failed to create device: {e}")))?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or_else(|| ArcadeError::RuntimeError("surface reports no formats".into()))?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        log::info!(
            "render: {} ({:?}), {}x{} {:?}",
            adapter.get_info().name,
            adapter.get_info().backend,
            config.width,
            config.height,
            surface_format
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            size,
        })
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
        }
    }
}

/// Paints draw lists onto the window via egui.
pub struct Presenter {
    egui_ctx: egui::Context,
    renderer: egui_wgpu::Renderer,
}

impl Presenter {
    pub fn new(context: &RenderContext) -> Self {
        let renderer = egui_wgpu::Renderer::new(&context.device, context.config.format, None, 1, false);
        Self {
            egui_ctx: egui::Context::default(),
            renderer,
        }
    }

    /// Draw `commands` (device pixels at `pixel_ratio`) onto the next frame.
    ///
    /// `scale_factor` is the window's physical-pixels-per-point.
    pub fn present(
        &mut self,
        context: &RenderContext,
        commands: &[DrawCmd],
        pixel_ratio: f32,
        scale_factor: f32,
    ) {
        let output = match context.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                context.surface.configure(&context.device, &context.config);
                return;
            }
            Err(e) => {
                log::warn!("render: surface error: {e:?}");
                return;
            }
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let screen_size = egui::vec2(
            context.config.width as f32 / scale_factor,
            context.config.height as f32 / scale_factor,
        );
        let mut raw_input = egui::RawInput {
            screen_rect: Some(egui::Rect::from_min_size(egui::Pos2::ZERO, screen_size)),
            ..Default::default()
        };
        raw_input
            .viewports
            .entry(raw_input.viewport_id)
            .or_default()
            .native_pixels_per_point = Some(scale_factor);

        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            let painter = ctx.layer_painter(egui::LayerId::new(
                egui::Order::Background,
                egui::Id::new("arcade_surface"),
            ));
            paint_commands(&painter, commands, pixel_ratio);
        });

        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [context.config.width, context.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        let mut encoder = context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Arcade Encoder"),
            });

        for (id, image_delta) in &full_output.textures_delta.set {
            self.renderer
                .update_texture(&context.device, &context.queue, *id, image_delta);
        }
        self.renderer.update_buffers(
            &context.device,
            &context.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );

        {
            let render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Arcade Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear_color(commands, context.config.format.is_srgb())),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            let mut render_pass = render_pass.forget_lifetime();
            self.renderer
                .render(&mut render_pass, &paint_jobs, &screen_descriptor);
        }

        context.queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            self.renderer.free_texture(id);
        }
        output.present();
    }
}

fn paint_commands(painter: &egui::Painter, commands: &[DrawCmd], pixel_ratio: f32) {
    for command in commands {
        match command {
            // Handled by the render pass load op.
            DrawCmd::Clear(_) => {}
            DrawCmd::FillRect { rect, color } => {
                painter.rect_filled(to_points(rect, pixel_ratio), 0.0, to_color32(*color));
            }
            DrawCmd::FillText {
                text,
                x,
                y,
                size,
                color,
                align,
            } => {
                painter.text(
                    egui::pos2(x / pixel_ratio, y / pixel_ratio),
                    anchor(*align),
                    text,
                    egui::FontId::proportional(size / pixel_ratio),
                    to_color32(*color),
                );
            }
        }
    }
}

fn to_points(rect: &Rect, pixel_ratio: f32) -> egui::Rect {
    egui::Rect::from_min_size(
        egui::pos2(rect.x / pixel_ratio, rect.y / pixel_ratio),
        egui::vec2(rect.width / pixel_ratio, rect.height / pixel_ratio),
    )
}

fn to_color32(color: Color) -> egui::Color32 {
    let [r, g, b, a] = color.to_rgba8();
    egui::Color32::from_rgba_unmultiplied(r, g, b, a)
}

/// Text commands anchor on their vertical center.
fn anchor(align: TextAlign) -> egui::Align2 {
    match align {
        TextAlign::Left => egui::Align2::LEFT_CENTER,
        TextAlign::Center => egui::Align2::CENTER_CENTER,
        TextAlign::Right => egui::Align2::RIGHT_CENTER,
    }
}

/// Background from the list's last `Clear`, black if there is none.
fn clear_color(commands: &[DrawCmd], srgb_target: bool) -> wgpu::Color {
    let color = commands
        .iter()
        .rev()
        .find_map(|cmd| match cmd {
            DrawCmd::Clear(color) => Some(*color),
            _ => None,
        })
        .unwrap_or(Color::BLACK);

    let channel = |c: f32| {
        let c = f64::from(c.clamp(0.0, 1.0));
        if srgb_target {
            srgb_to_linear(c)
        } else {
            c
        }
    };
    wgpu::Color {
        r: channel(color.r),
        g: channel(color.g),
        b: channel(color.b),
        a: f64::from(color.a.clamp(0.0, 1.0)),
    }
}

fn srgb_to_linear(c: f64) -> f64 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}
