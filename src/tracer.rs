use cfg_if::cfg_if;

use crate::def::*;
use crate::plane::*;

/* trace file support for comparing two builds line by line */

pub(crate) type Tracer = (Box<dyn std::io::Write>, isize);

cfg_if! {
    if #[cfg(feature = "trace")] {
        use std::fmt::Display;
        use std::fs::File;
        use std::io::{BufWriter, Write};

        pub(crate) fn OPEN_TRACE(encoder: bool) -> Option<Tracer> {
            let fp_trace_name = if encoder {
                "enc_trace.txt"
            } else {
                "dec_trace.txt"
            };
            if let Ok(fp_trace) = File::create(fp_trace_name) {
                Some((Box::new(BufWriter::new(fp_trace)), 0))
            } else {
                None
            }
        }

        pub(crate) fn TQ_TRACE_COUNTER(tracer: &mut Option<Tracer>) {
            if let Some((writer, counter)) = tracer {
                writer.write_fmt(format_args!("{} \t", *counter)).unwrap();
                *counter += 1;
            }
        }

        pub(crate) fn TQ_TRACE_STR(tracer: &mut Option<Tracer>, name: &str) {
            if let Some((writer, _)) = tracer {
                writer.write_all(name.as_bytes()).unwrap();
            }
        }

        pub(crate) fn TQ_TRACE<T: Display>(tracer: &mut Option<Tracer>, name: &str, t: T) {
            if let Some((writer, _)) = tracer {
                writer.write_fmt(format_args!("{} {}", name, t)).unwrap();
            }
        }
    } else {
        pub(crate) fn OPEN_TRACE(_encoder: bool) -> Option<Tracer> {
            None
        }
    }
}

cfg_if! {
    if #[cfg(feature = "trace_resi")] {
        pub(crate) fn TRACE_RESI(tracer: &mut Option<Tracer>, comp: usize, resi: &PlaneView<'_, pel>) {
            TQ_TRACE_COUNTER(tracer);
            TQ_TRACE_STR(tracer, "resi for ");
            TQ_TRACE(tracer, "comp", comp);
            TQ_TRACE_STR(tracer, "\n");
            if let Some((writer, _)) = tracer {
                for y in 0..resi.height {
                    for x in 0..resi.width {
                        writer
                            .write_fmt(format_args!("{:>5} ", resi.at(x, y)))
                            .unwrap();
                    }
                    writer.write_all(b"\n").unwrap();
                }
            }
        }
    } else {
        pub(crate) fn TRACE_RESI(_tracer: &mut Option<Tracer>, _comp: usize, _resi: &PlaneView<'_, pel>) {}
    }
}

cfg_if! {
    if #[cfg(feature = "trace_coef")] {
        pub(crate) fn TRACE_COEF(tracer: &mut Option<Tracer>, comp: usize, coef: &PlaneView<'_, TCoeff>) {
            TQ_TRACE_COUNTER(tracer);
            TQ_TRACE_STR(tracer, "coef for ");
            TQ_TRACE(tracer, "comp", comp);
            TQ_TRACE_STR(tracer, "\n");
            if let Some((writer, _)) = tracer {
                for y in 0..coef.height {
                    for x in 0..coef.width {
                        writer
                            .write_fmt(format_args!("{:>6} ", coef.at(x, y)))
                            .unwrap();
                    }
                    writer.write_all(b"\n").unwrap();
                }
            }
        }
    } else {
        pub(crate) fn TRACE_COEF(_tracer: &mut Option<Tracer>, _comp: usize, _coef: &PlaneView<'_, TCoeff>) {}
    }
}
