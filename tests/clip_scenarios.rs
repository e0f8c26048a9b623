// MIT/Apache2 License

use approx::assert_relative_eq;
use chalkclip::{
    geometry::{point2, Angle, Box2D, LocalRect, Path, Transform, Transform3D, Viewport, Winding},
    ClipConfig, ClipStack, Command, FlushCache, Primitive, Rasterizer, Recorder, ScissorRect,
    SoftwareTarget, StencilClearPolicy, StencilOp,
};
use std::rc::Rc;

const SIZE: i32 = 200;
const RED: u32 = 0xFF00_00FF;

fn setup_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn viewport() -> Viewport {
    Viewport::new(0.0, 0.0, SIZE as f32, SIZE as f32)
}

fn ortho() -> Transform {
    Transform::orthographic(SIZE as f32, SIZE as f32)
}

fn rotated(degrees: f32) -> Transform {
    ortho().pre_transform(&Transform3D::rotation(0.0, 0.0, 1.0, Angle::degrees(degrees)))
}

/// Rotate about the center of the target.
fn spun(degrees: f32) -> Transform {
    let local = Transform3D::translation(-100.0, -100.0, 0.0)
        .then(&Transform3D::rotation(0.0, 0.0, 1.0, Angle::degrees(degrees)))
        .then_translate(euclid::vec3(100.0, 100.0, 0.0));
    ortho().pre_transform(&local)
}

fn rect(x0: f32, y0: f32, x1: f32, y1: f32) -> LocalRect {
    Box2D::new(point2(x0, y0), point2(x1, y1))
}

fn circle(cx: f32, cy: f32, r: f32) -> Rc<Primitive> {
    let mut builder = Path::builder();
    builder.add_circle(point2(cx, cy), r, Winding::Positive);
    Rc::new(Primitive::fill_path(&builder.build()).unwrap())
}

fn push_circle(stack: &ClipStack, prim: &Rc<Primitive>) -> ClipStack {
    stack.push_primitive(prim.clone(), prim.bounds(), &ortho(), &viewport())
}

/// Flush `stack` onto a fresh target and fill the whole target with red.
fn render(mut target: SoftwareTarget, stack: &ClipStack, config: ClipConfig) -> SoftwareTarget {
    FlushCache::new(config)
        .flush(stack, &mut target, |_| Ok(()))
        .unwrap();
    target.fill(RED);
    target
}

#[test]
fn circle_and_rectangle_intersect() {
    setup_logging();
    let stack = ClipStack::new().push_rect(rect(80.0, 80.0, 150.0, 150.0), &ortho(), &viewport());
    let stack = push_circle(&stack, &circle(100.0, 100.0, 50.0));

    let target = render(SoftwareTarget::new(SIZE, SIZE), &stack, ClipConfig::default());

    assert_eq!(target.pixel(90, 90), Some(RED));
    assert_eq!(target.pixel(120, 120), Some(RED));
    assert_eq!(target.pixel(10, 10), Some(0));
    // inside the square, outside the circle
    assert_eq!(target.pixel(145, 145), Some(0));
    // inside the circle, outside the square
    assert_eq!(target.pixel(60, 100), Some(0));

    let expected = (80..150)
        .flat_map(|y| (80..150).map(move |x| (x, y)))
        .filter(|&(x, y)| {
            let (dx, dy) = (x as f32 + 0.5 - 100.0, y as f32 + 0.5 - 100.0);
            dx * dx + dy * dy < 50.0 * 50.0
        })
        .count();
    assert_relative_eq!(
        target.count_pixels(RED) as f32,
        expected as f32,
        max_relative = 0.02
    );
}

#[test]
fn repeated_flush_issues_no_commands() {
    setup_logging();
    let stack = push_circle(
        &ClipStack::new().push_rect(rect(10.0, 10.0, 190.0, 190.0), &rotated(5.0), &viewport()),
        &circle(100.0, 100.0, 60.0),
    );

    let mut target = Recorder::new(SoftwareTarget::new(SIZE, SIZE));
    let mut cache = FlushCache::default();
    cache.flush(&stack, &mut target, |_| Ok(())).unwrap();
    assert!(!target.commands().is_empty());

    target.reset();
    let saved = stack.clone();
    cache.flush(&saved, &mut target, |_| Ok(())).unwrap();
    assert!(target.commands().is_empty());
}

#[test]
fn scissor_only_stacks_leave_stencil_alone() {
    setup_logging();
    let stack = ClipStack::new()
        .push_rect(rect(0.0, 0.0, 150.0, 150.0), &ortho(), &viewport())
        .push_window_rect(Box2D::new(point2(20, 20), point2(180, 180)))
        .push_rect(
            rect(0.0, 0.0, 50.0, 50.0),
            &ortho().pre_transform(&Transform3D::translation(30.0, 30.0, 0.0)),
            &viewport(),
        );

    let mut target = Recorder::new(SoftwareTarget::new(SIZE, SIZE));
    FlushCache::default()
        .flush(&stack, &mut target, |_| Ok(()))
        .unwrap();

    assert_eq!(target.count(|c| *c == Command::StencilTest(true)), 0);
    assert_eq!(target.draw_calls(), 0);
    assert!(target.commands().contains(&Command::Scissor(Some(ScissorRect {
        x: 30,
        y: 120,
        width: 50,
        height: 50,
    }))));

    let mut target = target.into_inner();
    target.fill(RED);
    assert_eq!(target.count_pixels(RED), 50 * 50);
}

#[test]
fn one_primitive_among_rectangles_is_one_pass() {
    setup_logging();
    let mut stack = ClipStack::new();
    for i in 0..5 {
        let inset = i as f32 * 5.0;
        stack = stack.push_rect(rect(inset, inset, 200.0 - inset, 200.0 - inset), &ortho(), &viewport());
    }
    let stack = push_circle(&stack, &circle(100.0, 100.0, 40.0));
    let stack = stack.push_window_rect(Box2D::new(point2(0, 0), point2(150, 150)));

    let mut target = Recorder::new(SoftwareTarget::new(SIZE, SIZE));
    FlushCache::default()
        .flush(&stack, &mut target, |_| Ok(()))
        .unwrap();

    assert_eq!(target.count(|c| *c == Command::DrawPrimitive), 1);
    assert_eq!(target.draw_calls(), 1);
    assert_eq!(target.count(|c| *c == Command::StencilOp(StencilOp::Replace)), 1);
    assert_eq!(target.count(|c| *c == Command::StencilOp(StencilOp::Incr)), 0);
}

#[test]
fn disjoint_rectangles_draw_nothing() {
    setup_logging();
    let stack = ClipStack::new()
        .push_rect(rect(0.0, 0.0, 50.0, 50.0), &ortho(), &viewport())
        .push_rect(rect(100.0, 100.0, 150.0, 150.0), &rotated(3.0), &viewport());

    let mut target = Recorder::new(SoftwareTarget::new(SIZE, SIZE));
    FlushCache::default()
        .flush(&stack, &mut target, |_| Ok(()))
        .unwrap();
    assert_eq!(target.draw_calls(), 0);

    let mut target = target.into_inner();
    target.fill(RED);
    assert_eq!(target.count_pixels(RED), 0);
}

#[test]
fn stencil_entries_are_anded() {
    setup_logging();
    let stack = ClipStack::new().push_rect(rect(50.0, 50.0, 150.0, 150.0), &spun(20.0), &viewport());
    let stack = push_circle(&stack, &circle(100.0, 100.0, 70.0));
    let stack = push_circle(&stack, &circle(100.0, 130.0, 40.0));

    let target = render(SoftwareTarget::new(SIZE, SIZE), &stack, ClipConfig::default());

    // inside every shape
    assert_eq!(target.pixel(99, 120), Some(RED));
    assert_eq!(target.stencil_value(99, 120), Some(1));
    // inside both circles, past the corner of the square
    assert_eq!(target.pixel(99, 160), Some(0));
    // inside the square and the big circle only
    assert_eq!(target.pixel(65, 100), Some(0));
    assert_eq!(target.stencil_value(65, 100), Some(0));
}

#[test]
fn clear_policies_agree() {
    setup_logging();
    let stack = push_circle(
        &ClipStack::new().push_rect(rect(30.0, 30.0, 170.0, 170.0), &rotated(10.0), &viewport()),
        &circle(90.0, 110.0, 55.0),
    );

    let dirty = || {
        let mut target = SoftwareTarget::new(SIZE, SIZE);
        target.clear_stencil(0xAB).unwrap();
        target
    };

    let scissored = render(dirty(), &stack, ClipConfig::default());
    let drawn = render(
        dirty(),
        &stack,
        ClipConfig {
            stencil_clear: StencilClearPolicy::BoundsRect,
            ..Default::default()
        },
    );

    assert!(scissored.count_pixels(RED) > 0);
    assert_eq!(scissored.colors(), drawn.colors());
}

#[test]
fn offscreen_and_onscreen_render_alike() {
    setup_logging();
    let stack = ClipStack::new()
        .push_rect(rect(10.0, 20.0, 120.0, 90.0), &ortho(), &viewport())
        .push_rect(rect(50.0, 0.0, 150.0, 100.0), &rotated(15.0), &viewport());

    let onscreen = render(SoftwareTarget::new(SIZE, SIZE), &stack, ClipConfig::default());
    let offscreen = render(
        SoftwareTarget::new_offscreen(SIZE, SIZE),
        &stack,
        ClipConfig::default(),
    );

    assert!(onscreen.count_pixels(RED) > 0);
    assert_eq!(onscreen.colors(), offscreen.colors());
}

#[test]
fn viewport_change_reflushes_with_workaround() {
    setup_logging();
    let stack = ClipStack::new().push_rect(rect(0.0, 0.0, 100.0, 100.0), &ortho(), &viewport());
    let config = ClipConfig {
        viewport_scissor_workaround: true,
        ..Default::default()
    };

    let mut target = Recorder::new(SoftwareTarget::new_offscreen(SIZE, SIZE));
    let mut cache = FlushCache::new(config);
    cache.flush(&stack, &mut target, |_| Ok(())).unwrap();
    target.reset();

    cache.flush(&stack, &mut target, |_| Ok(())).unwrap();
    assert!(target.commands().is_empty());

    target
        .inner_mut()
        .set_viewport(Viewport::new(50.0, 60.0, 100.0, 100.0));
    cache.flush(&stack, &mut target, |_| Ok(())).unwrap();
    assert!(target.commands().contains(&Command::Scissor(Some(ScissorRect {
        x: 50,
        y: 60,
        width: 50,
        height: 40,
    }))));

    // without the workaround the viewport is not tracked
    let mut target = Recorder::new(SoftwareTarget::new_offscreen(SIZE, SIZE));
    let mut cache = FlushCache::default();
    cache.flush(&stack, &mut target, |_| Ok(())).unwrap();
    target.reset();
    target
        .inner_mut()
        .set_viewport(Viewport::new(50.0, 60.0, 100.0, 100.0));
    cache.flush(&stack, &mut target, |_| Ok(())).unwrap();
    assert!(target.commands().is_empty());
}

#[test]
fn workaround_scissors_empty_stack_to_viewport() {
    setup_logging();
    let config = ClipConfig {
        viewport_scissor_workaround: true,
        ..Default::default()
    };

    let mut target = SoftwareTarget::new(SIZE, SIZE);
    target.set_viewport(Viewport::new(0.0, 0.0, 100.0, 50.0));
    let target = render(target, &ClipStack::new(), config);
    assert_eq!(target.count_pixels(RED), 100 * 50);
    assert_eq!(target.pixel(0, 0), Some(RED));
    assert_eq!(target.pixel(0, 50), Some(0));
}

#[test]
fn invalidate_recovers_from_outside_changes() {
    setup_logging();
    let stack = push_circle(&ClipStack::new(), &circle(100.0, 100.0, 30.0));

    let mut target = SoftwareTarget::new(SIZE, SIZE);
    let mut cache = FlushCache::default();
    cache.flush(&stack, &mut target, |_| Ok(())).unwrap();

    // someone else scribbles over the stencil state
    target.set_stencil_test(false).unwrap();
    cache.invalidate();
    cache.flush(&stack, &mut target, |_| Ok(())).unwrap();

    target.fill(RED);
    assert_eq!(target.pixel(100, 100), Some(RED));
    // inside the scissor rectangle, outside the circle
    assert_eq!(target.pixel(72, 72), Some(0));
}

#[test]
fn pending_draws_land_before_the_clip_changes() {
    setup_logging();
    let left = ClipStack::new().push_window_rect(Box2D::new(point2(0, 0), point2(100, 200)));
    let right = ClipStack::new().push_window_rect(Box2D::new(point2(100, 0), point2(200, 200)));

    let mut target = SoftwareTarget::new(SIZE, SIZE);
    let mut cache = FlushCache::default();
    cache.flush(&left, &mut target, |_| Ok(())).unwrap();

    // the queued fill still runs under the left clip
    cache
        .flush(&right, &mut target, |t| {
            t.fill(RED);
            Ok(())
        })
        .unwrap();

    assert_eq!(target.pixel(50, 50), Some(RED));
    assert_eq!(target.pixel(150, 50), Some(0));
}

#[test]
fn rasterizer_draws_are_clipped() {
    setup_logging();
    let stack = push_circle(
        &ClipStack::new().push_rect(rect(40.0, 40.0, 160.0, 160.0), &ortho(), &viewport()),
        &circle(100.0, 100.0, 50.0),
    );

    let mut target = SoftwareTarget::new(SIZE, SIZE);
    FlushCache::default()
        .flush(&stack, &mut target, |_| Ok(()))
        .unwrap();

    target.set_paint(RED);
    target.set_transform(ortho());
    target.draw_rectangle(rect(0.0, 0.0, 200.0, 100.0)).unwrap();

    // only the top half of the circle is painted
    let row = |y: i32| (0..target.width()).filter(|&x| target.pixel(x, y) == Some(RED)).count();
    assert_eq!(row(150), 0);
    assert_eq!(row(10), 0);
    assert!(row(99) > 90);
    assert_eq!(target.pixel(100, 60), Some(RED));
    assert_eq!(target.pixel(100, 120), Some(0));
    assert_eq!(target.pixel(45, 60), Some(0));
}
