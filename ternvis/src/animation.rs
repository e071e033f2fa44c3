//! Frame pacing between the engine and the drawing model.

use std::{
    cell::{Cell, RefCell},
    collections::VecDeque,
    rc::Rc,
    time::Duration,
};

use ternvis_observer::Observer;
use ternvis_scene::TreeDrawingModel;
use ternvis_types::{ActionsBatch, TreeAction};

/// Delay between animation frames.
pub const FRAME_DELAY: Duration = Duration::from_millis(300);

/// A one-shot deadline on the host event loop.
///
/// Any primitive that delivers a single callback after the requested delay
/// fits: a GUI toolkit timer in the real application, [`ManualScheduler`]
/// in tests. The callback must end up in [`AnimationProducer::tick`].
pub trait FrameScheduler {
    /// Requests a single callback after `delay`. A new request supersedes a
    /// pending one.
    fn arm(&mut self, delay: Duration);
    /// Drops the pending callback, if any.
    fn cancel(&mut self);
    fn is_armed(&self) -> bool;
}

/// Scheduler for tests and headless runs: remembers the requested deadline
/// until the driver fires it by hand.
#[derive(Debug, Default, Clone)]
pub struct ManualScheduler {
    deadline: Rc<Cell<Option<Duration>>>,
}

impl ManualScheduler {
    /// Takes the pending deadline, disarming the scheduler; the driver then
    /// calls [`AnimationProducer::tick`] itself.
    pub fn take_deadline(&self) -> Option<Duration> {
        self.deadline.take()
    }
}

impl FrameScheduler for ManualScheduler {
    fn arm(&mut self, delay: Duration) {
        self.deadline.set(Some(delay));
    }

    fn cancel(&mut self) {
        self.deadline.set(None);
    }

    fn is_armed(&self) -> bool {
        self.deadline.get().is_some()
    }
}

/// Paces query traces into the drawing model, one frame per batch.
///
/// Batches queue up as the engine emits them; once a query's `EndQuery`
/// arrives the producer starts handing batches to the model, spacing frames
/// by [`FRAME_DELAY`] on the scheduler. A new query pre-empts a running
/// animation: all pending frames are folded into the model at once, so the
/// fresh animation starts from the previous query's final state.
pub struct AnimationProducer<S: FrameScheduler + 'static> {
    inner: Rc<RefCell<Inner<S>>>,
    port: Observer<ActionsBatch>,
}

struct Inner<S> {
    pending: VecDeque<ActionsBatch>,
    scheduler: S,
    model: Rc<RefCell<TreeDrawingModel>>,
}

impl<S: FrameScheduler + 'static> AnimationProducer<S> {
    pub fn new(model: Rc<RefCell<TreeDrawingModel>>, scheduler: S) -> Self {
        let inner = Rc::new(RefCell::new(Inner {
            pending: VecDeque::new(),
            scheduler,
            model,
        }));
        let on_subscribe = inner.clone();
        let on_notify = inner.clone();
        let port = Observer::new(
            move |batch: &ActionsBatch| Inner::handle_notification(&on_subscribe, batch),
            move |batch: &ActionsBatch| Inner::handle_notification(&on_notify, batch),
            || {},
        );
        AnimationProducer { inner, port }
    }

    /// The sink the engine's action stream subscribes to.
    pub fn observer_port(&self) -> &Observer<ActionsBatch> {
        &self.port
    }

    /// Timer callback: renders the next pending frame and re-arms while
    /// more are waiting.
    pub fn tick(&self) {
        Inner::animate(&self.inner);
    }

    /// Batches waiting for their frame.
    pub fn pending_frames(&self) -> usize {
        self.inner.borrow().pending.len()
    }
}

impl<S: FrameScheduler> Inner<S> {
    fn handle_notification(this: &Rc<RefCell<Self>>, batch: &ActionsBatch) {
        for (index, action) in batch.iter().enumerate() {
            match action {
                TreeAction::StartQuery => debug_assert!(
                    index == 0 && batch.len() == 1,
                    "StartQuery must travel alone in its batch"
                ),
                TreeAction::EndQuery => debug_assert!(
                    index + 1 == batch.len() && batch.len() == 1,
                    "EndQuery must travel alone in its batch"
                ),
                _ => {}
            }
        }
        if batch.first() == Some(&TreeAction::StartQuery) {
            Self::finish_immediately(this);
        }
        this.borrow_mut().pending.push_back(batch.clone());
        if batch.last() == Some(&TreeAction::EndQuery) {
            Self::animate(this);
        }
    }

    /// Renders one frame off the queue and arms the timer while frames
    /// remain. The animation "loop" is this method re-entered from the
    /// scheduler until the queue runs dry or a new query drains it.
    fn animate(this: &Rc<RefCell<Self>>) {
        let front = this.borrow_mut().pending.pop_front();
        let Some(batch) = front else {
            return;
        };
        let model = this.borrow().model.clone();
        model.borrow_mut().apply(&batch);
        let mut inner = this.borrow_mut();
        if !inner.pending.is_empty() {
            inner.scheduler.arm(FRAME_DELAY);
        }
    }

    /// Folds everything still pending into the model in one go and stops
    /// the timer, so the next query animates on top of this one's final
    /// state.
    fn finish_immediately(this: &Rc<RefCell<Self>>) {
        loop {
            let front = this.borrow_mut().pending.pop_front();
            let Some(batch) = front else {
                break;
            };
            let model = this.borrow().model.clone();
            model.borrow_mut().apply(&batch);
        }
        let mut inner = this.borrow_mut();
        if inner.scheduler.is_armed() {
            inner.scheduler.cancel();
        }
    }
}

#[cfg(test)]
mod test {
    use std::{cell::RefCell, rc::Rc};

    use ternvis_scene::TreeDrawingModel;
    use ternvis_tree::TwoThreeTree;

    use super::{AnimationProducer, FrameScheduler, ManualScheduler};

    fn wired() -> (
        TwoThreeTree,
        Rc<RefCell<TreeDrawingModel>>,
        AnimationProducer<ManualScheduler>,
        ManualScheduler,
    ) {
        let tree = TwoThreeTree::new();
        let model = Rc::new(RefCell::new(TreeDrawingModel::new()));
        let scheduler = ManualScheduler::default();
        let producer = AnimationProducer::new(model.clone(), scheduler.clone());
        tree.subscribe(producer.observer_port());
        (tree, model, producer, scheduler)
    }

    #[test]
    fn frames_wait_for_the_timer() {
        let (mut tree, model, producer, scheduler) = wired();
        // Subscription snapshot waits in the queue until something animates.
        assert_eq!(producer.pending_frames(), 1);
        assert_eq!(model.borrow().frames_rendered(), 0);

        tree.insert(1);
        // Snapshot + StartQuery rendered when EndQuery arrived and started
        // the animation; the structural frame and EndQuery still queued.
        // One frame per batch from here on, driven by the timer.
        let rendered = model.borrow().frames_rendered();
        assert!(rendered > 0);
        assert_eq!(producer.pending_frames(), 2);
        assert!(scheduler.is_armed());

        scheduler.take_deadline().expect("timer is armed");
        producer.tick();
        assert_eq!(model.borrow().frames_rendered(), rendered + 1);
        assert_eq!(producer.pending_frames(), 1);

        scheduler.take_deadline().expect("timer is armed");
        producer.tick();
        assert_eq!(producer.pending_frames(), 0);
        assert!(
            scheduler.take_deadline().is_none(),
            "timer must rest once the queue is dry"
        );
    }

    #[test]
    fn new_query_preempts_a_running_animation() {
        let (mut tree, model, producer, scheduler) = wired();
        tree.insert(1);
        assert!(producer.pending_frames() > 0);

        // No ticks in between: the next query must fast-forward the rest.
        tree.insert(2);
        let frames_after_preempt = model.borrow().frames_rendered();
        assert!(frames_after_preempt > 0);

        // Drain the second query's animation by hand.
        while producer.pending_frames() > 0 {
            scheduler.take_deadline();
            producer.tick();
        }
        let scene = model.borrow().scene().clone();
        assert_eq!(scene.cells.len(), 2, "both keys visible in the final frame");
    }

    #[test]
    fn ticks_without_pending_frames_are_harmless() {
        let (_tree, model, producer, _scheduler) = wired();
        producer.tick(); // renders the subscription snapshot
        let rendered = model.borrow().frames_rendered();
        producer.tick();
        assert_eq!(model.borrow().frames_rendered(), rendered);
    }
}
