use std::io::Cursor;
use wireidx::{Analyzer, ComparisonReport, IndexBuilder, IndexSchema, RecordParser};

const CORPUS: &str = "\
<DOC>
<DOCNO> AP890101-0001 </DOCNO>
<TEXT>
The new year opened with new trade talks between the two nations.
</TEXT>
</DOC>
<DOC>
<DOCNO> AP890101-0002 </DOCNO>
<TEXT>Markets were quiet as the new quarter began.</TEXT>
</DOC>
<DOC>
<DOCNO> AP890102-0001 </DOCNO>
<TEXT>Heavy storms swept the coast overnight.</TEXT>
</DOC>
";

fn main() -> anyhow::Result<()> {
    println!("=== Analyzer comparison over an inline corpus ===\n");

    let schema = IndexSchema::single_text("TEXT");
    let allowlist = schema.allowlist();

    // One builder per analyzer variant, all fed the same record stream.
    let mut builders: Vec<IndexBuilder> = Analyzer::ALL
        .iter()
        .map(|&analyzer| IndexBuilder::new(analyzer, schema.clone()))
        .collect();

    for record in RecordParser::new(Cursor::new(CORPUS), &allowlist) {
        let record = record?;
        for builder in builders.iter_mut() {
            builder.ingest(&record)?;
        }
    }

    let mut indexes = Vec::new();
    for mut builder in builders {
        indexes.push(builder.finalize()?);
    }

    let report = ComparisonReport::new(&indexes, "TEXT", "new");
    print!("{}", report.render());

    println!("\n=== Example Complete ===");
    Ok(())
}
