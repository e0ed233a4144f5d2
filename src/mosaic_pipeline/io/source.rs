use std::collections::VecDeque;

use crate::mosaic_pipeline::common::error::Result;
use crate::mosaic_pipeline::frame::Image;

/// Pull-based supply of frames.
///
/// `Ok(None)` means "nothing available right now", not "finished": sources
/// paced by an external capture process may return frames again on a later
/// call.
pub trait FrameSource {
    fn next_frame(&mut self) -> Result<Option<Image>>;

    /// Iterator over the frames available right now.
    fn frames(&mut self) -> Frames<'_, Self>
    where
        Self: Sized,
    {
        Frames { source: self }
    }
}

pub struct Frames<'a, S: FrameSource> {
    source: &'a mut S,
}

impl<S: FrameSource> Iterator for Frames<'_, S> {
    type Item = Result<Image>;

    fn next(&mut self) -> Option<Self::Item> {
        self.source.next_frame().transpose()
    }
}

impl FrameSource for VecDeque<Image> {
    fn next_frame(&mut self) -> Result<Option<Image>> {
        Ok(self.pop_front())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_source_drains_in_order() {
        let mut queue: VecDeque<Image> = VecDeque::from(vec![Image::new(1, 1), Image::new(2, 2)]);
        let shapes: Vec<_> = queue.frames().map(|f| f.unwrap().shape()).collect();
        assert_eq!(shapes, vec![(1, 1), (2, 2)]);
        assert!(queue.next_frame().unwrap().is_none());
    }
}
