use std::{
    path::Path,
    sync::mpsc::{channel, Receiver},
    time::Duration,
};

use anyhow::Context;
use notify_debouncer_mini::{
    new_debouncer_opt,
    notify::{RecommendedWatcher, RecursiveMode},
    DebounceEventResult, DebouncedEventKind, Debouncer,
};
use pollster::block_on;
use wgpu::PollType;

const SHADER_FOLDER: &str = "assets/shaders";

#[derive(Debug, Clone)]
pub(crate) struct ShaderDefinition {
    pub name: &'static str,
    pub path: &'static str,
}

// Compiles a shader into a pipeline and recompiles it in the watcher thread
// whenever the file changes on disk.
pub(crate) struct ShaderLoader {
    pub pipeline: wgpu::RenderPipeline,
    shader: ShaderDefinition,
    receiver: Receiver<wgpu::RenderPipeline>,
    _debouncer: Option<Debouncer<RecommendedWatcher>>,
}

impl ShaderLoader {
    pub fn new<F>(
        device: wgpu::Device,
        shader: ShaderDefinition,
        mut load_pipeline: F,
    ) -> anyhow::Result<Self>
    where
        F: 'static
            + Send
            + FnMut(&wgpu::Device, &ShaderDefinition, &str) -> anyhow::Result<wgpu::RenderPipeline>,
    {
        let pipeline = compile_file(&device, &shader, &mut load_pipeline)
            .with_context(|| format!("Failed to compile {}", shader.name))?;

        let (send_pipeline, receive_pipeline) = channel();

        let debouncer = watch_shader(device, shader.clone(), load_pipeline, move |pipeline| {
            // The loader may already be gone during shutdown
            let _ = send_pipeline.send(pipeline);
        })
        .map_err(|e| log::warn!("Shader hot reload disabled: {:#}", e))
        .ok();

        Ok(Self {
            pipeline,
            shader,
            receiver: receive_pipeline,
            _debouncer: debouncer,
        })
    }

    pub(crate) fn load_pending_shaders(&mut self) {
        while let Ok(pipeline) = self.receiver.try_recv() {
            log::info!("Reloaded shader: {}", self.shader.name);
            self.pipeline = pipeline;
        }
    }
}

fn watch_shader<F, S>(
    device: wgpu::Device,
    shader: ShaderDefinition,
    mut load_pipeline: F,
    on_reload: S,
) -> anyhow::Result<Debouncer<RecommendedWatcher>>
where
    F: 'static
        + Send
        + FnMut(&wgpu::Device, &ShaderDefinition, &str) -> anyhow::Result<wgpu::RenderPipeline>,
    S: 'static + Send + Fn(wgpu::RenderPipeline),
{
    let mut debouncer = new_debouncer_opt::<_, RecommendedWatcher>(
        notify_debouncer_mini::Config::default().with_timeout(Duration::from_millis(100)),
        move |res: DebounceEventResult| match res {
            Ok(events) => {
                let changed = events.iter().any(|event| {
                    event.path.ends_with(shader.path) && event.kind == DebouncedEventKind::Any
                });

                if changed {
                    match compile_file(&device, &shader, &mut load_pipeline) {
                        Ok(pipeline) => on_reload(pipeline),
                        Err(e) => log::error!("Failed to reload shader {}: {:#}", shader.name, e),
                    }
                }
            }
            Err(e) => log::warn!("Error debouncing shader changes: {}", e),
        },
    )
    .context("Failed to create shader watcher")?;

    let absolute_shader_folder = Path::new(SHADER_FOLDER)
        .canonicalize()
        .with_context(|| format!("Shader folder {} not found", SHADER_FOLDER))?;

    debouncer
        .watcher()
        .watch(&absolute_shader_folder, RecursiveMode::Recursive)
        .context("Failed to watch shader folder")?;

    Ok(debouncer)
}

fn compile_file<F>(
    device: &wgpu::Device,
    shader_def: &ShaderDefinition,
    f: &mut F,
) -> anyhow::Result<wgpu::RenderPipeline>
where
    F: FnMut(&wgpu::Device, &ShaderDefinition, &str) -> anyhow::Result<wgpu::RenderPipeline>,
{
    device.push_error_scope(wgpu::ErrorFilter::Validation);

    let path = Path::new(SHADER_FOLDER).join(shader_def.path);
    let shader_code = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read shader file {}", path.display()));

    let pipeline = shader_code.and_then(|source| f(device, shader_def, &source));

    device
        .poll(PollType::Wait)
        .context("Failed to poll device after shader compilation.")?;

    let error = block_on(device.pop_error_scope());

    if let Some(error) = error {
        return Err(anyhow::anyhow!(
            "Shader compilation failed for {}: {}",
            shader_def.name,
            error
        ));
    };

    pipeline
}
