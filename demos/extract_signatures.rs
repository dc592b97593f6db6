use savedmodel_parser::{parse_tensor_name, MetadataLoader, Result};
use std::env;
use std::path::Path;

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let metadata_path = if args.len() > 1 {
        Path::new(&args[1])
    } else {
        panic!("Please provide a path to a serialized MetaGraphDef file");
    };

    println!("Loading metadata from: {}", metadata_path.display());

    let table = MetadataLoader::load_signatures(metadata_path)?;

    println!("\nSignatures: {}", table.len());
    println!("-----------");
    for (name, signature) in table.iter() {
        println!("\nSignature: {}", name);

        println!("  Inputs: {}", signature.inputs.len());
        for (alias, info) in &signature.inputs {
            let (op, index) = parse_tensor_name(&info.name);
            println!(
                "    {} -> {} (output {}) - dtype {} - {:?}",
                alias, op, index, info.dtype, info.shape.dims
            );
        }

        println!("  Outputs: {}", signature.outputs.len());
        for (alias, info) in &signature.outputs {
            let (op, index) = parse_tensor_name(&info.name);
            println!(
                "    {} -> {} (output {}) - dtype {} - {:?}",
                alias, op, index, info.dtype, info.shape.dims
            );
        }
    }

    Ok(())
}
