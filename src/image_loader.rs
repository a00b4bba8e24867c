//! Fire-and-forget image loading on the rayon pool.
//!
//! Finished images are handed back over a channel and picked up by the
//! renderer at the start of a frame. Failed loads are dropped: the surface
//! keeps its blank placeholder.

use std::sync::mpsc::{channel, Receiver, Sender};

use anyhow::Context;
use image::RgbaImage;

use crate::{frames::ImageSource, scene_graph::object3d::ObjectId};

pub struct LoadedImage {
    pub object: ObjectId,
    pub image: RgbaImage,
}

pub struct ImageLoader {
    sender: Sender<LoadedImage>,
    receiver: Receiver<LoadedImage>,
}

impl ImageLoader {
    pub fn new() -> Self {
        let (sender, receiver) = channel();
        Self { sender, receiver }
    }

    /// Starts loading `source` for `object` in the background.
    pub fn request(&self, object: ObjectId, source: ImageSource) {
        let sender = self.sender.clone();

        rayon::spawn(move || match load_image(&source) {
            Ok(image) => {
                log::debug!(
                    "Loaded {:?} ({}x{})",
                    source,
                    image.width(),
                    image.height()
                );
                // The receiver is gone when the window has closed
                let _ = sender.send(LoadedImage { object, image });
            }
            Err(e) => log::debug!("Image {:?} unavailable: {:#}", source, e),
        });
    }

    /// Images that finished since the last call, without blocking.
    pub fn drain_loaded(&self) -> impl Iterator<Item = LoadedImage> + '_ {
        self.receiver.try_iter()
    }
}

fn load_image(source: &ImageSource) -> anyhow::Result<RgbaImage> {
    let bytes = match source {
        ImageSource::File(path) => std::fs::read(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        _ => {
            let url = source.url().context("Image source has no URL")?;
            fetch(&url)?
        }
    };

    let image = image::load_from_memory(&bytes).context("Failed to decode image")?;

    Ok(image.to_rgba8())
}

fn fetch(url: &str) -> anyhow::Result<Vec<u8>> {
    let mut response = ureq::get(url)
        .call()
        .with_context(|| format!("Failed to download {}", url))?;

    response
        .body_mut()
        .read_to_vec()
        .with_context(|| format!("Failed to read response body from {}", url))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene_graph::{object3d::Object3D, scene::Scene};
    use std::time::Duration;

    fn object_id() -> ObjectId {
        Scene::new().add_object(Object3D::default())
    }

    #[test]
    fn test_file_image_arrives_on_channel() {
        let path = std::env::temp_dir().join(format!("frame-gallery-test-{}.png", std::process::id()));
        RgbaImage::from_pixel(4, 2, image::Rgba([10, 20, 30, 255]))
            .save(&path)
            .unwrap();

        let loader = ImageLoader::new();
        let object = object_id();
        loader.request(object, ImageSource::File(path.clone()));

        let loaded = loader.receiver.recv_timeout(Duration::from_secs(10)).unwrap();
        assert_eq!(loaded.object, object);
        assert_eq!(loaded.image.dimensions(), (4, 2));
        assert_eq!(loaded.image.get_pixel(3, 1).0, [10, 20, 30, 255]);

        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_missing_file_degrades_silently() {
        let loader = ImageLoader::new();
        loader.request(
            object_id(),
            ImageSource::File("definitely/not/here.jpg".into()),
        );

        assert!(loader
            .receiver
            .recv_timeout(Duration::from_millis(300))
            .is_err());
        assert_eq!(loader.drain_loaded().count(), 0);
    }

    #[test]
    fn test_undecodable_bytes_are_rejected() {
        let path = std::env::temp_dir().join(format!("frame-gallery-garbage-{}.jpg", std::process::id()));
        std::fs::write(&path, b"not an image").unwrap();

        assert!(load_image(&ImageSource::File(path.clone())).is_err());

        std::fs::remove_file(path).unwrap();
    }
}
