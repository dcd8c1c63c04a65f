use criterion::*;

cfg_if::cfg_if! {
    if #[cfg(feature="bench")] {

        criterion_main!(transform::fwd, transform::inv);
    } else {
        fn bench_no_op(_: &mut Criterion) {
        }
        criterion_group!(
            no_op,
            bench_no_op,
        );
        criterion_main!(no_op);
    }
}
