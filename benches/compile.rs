use criterion::{black_box, criterion_group, criterion_main, Criterion};

static VARIABLES: &str = "\
$pad = 4px
$accent = #336699
.card
  padding: $pad * 2
  color: $accent
";

static MIXINS: &str = "\
pad(n)
  padding: n * 2
for i in 1..20
  .m-{i}
    pad(1px * i)
";

static PLAIN_CSS: &str = "\
a { color: red; }
b { margin: 0 auto; }
.c { font: 16px/1.2 sans-serif; }
";

pub fn variables(c: &mut Criterion) {
    c.bench_function("variables", |b| {
        b.iter(|| {
            stylet::from_string(
                black_box(VARIABLES.to_string()),
                &stylet::Options::default(),
            )
        })
    });
}

pub fn mixins_and_iteration(c: &mut Criterion) {
    c.bench_function("mixins_and_iteration", |b| {
        b.iter(|| {
            stylet::from_string(black_box(MIXINS.to_string()), &stylet::Options::default())
        })
    });
}

pub fn plain_css_passthrough(c: &mut Criterion) {
    c.bench_function("plain_css_passthrough", |b| {
        b.iter(|| {
            stylet::from_string(
                black_box(PLAIN_CSS.to_string()),
                &stylet::Options::default(),
            )
        })
    });
}

criterion_group!(benches, variables, mixins_and_iteration, plain_css_passthrough);
criterion_main!(benches);
