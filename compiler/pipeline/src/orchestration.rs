//! Stage sequencing.
//!
//! A run is driven entirely by its [`PipelinePlan`]:
//!
//! 1. archives → XML models (external converter), only for archive origins;
//! 2. XML models → intermediate models, for `generate-modane` and `generate-cpp`
//!    unless the run starts from intermediate models;
//! 3. intermediate models → C++, for `generate-cpp`.
//!
//! Every model is loaded through one [`ResourceIdentityCache`] owned by the run.

use std::fs;
use std::path::PathBuf;
use std::rc::Rc;

use codegen::{write_generated, CodeGenerator, CppGenerator, GenerationRequest};
use model::{
    IntermediateModelParser, ModelFormat, Resource, ResourceIdentityCache, ResourceKey,
    ResourceLoader, ResourceParser, XmlModelParser,
};
use transform::{ModelTransformer, ReferenceTransformer, TransformOptions};

use crate::converter::ArchiveConverter;
use crate::scope::GenerationScope;
use crate::{Command, PipelineError, PipelinePlan, Result, StageOrigin};

/// What a run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// XML models produced by the converter
    pub converted: Vec<PathBuf>,
    /// Every resource key resident in the cache at the end of the run, in load order
    pub loaded: Vec<ResourceKey>,
    /// Keys of the resources that were in generation scope
    pub in_scope: Vec<ResourceKey>,
    /// Intermediate model files written
    pub written_models: Vec<PathBuf>,
    /// Generated C++ and CMake files
    pub generated: Vec<PathBuf>,
}

/// Executes a [`PipelinePlan`].
pub struct PipelineOrchestrator<'a> {
    plan: PipelinePlan,
    converter: Option<Box<dyn ArchiveConverter + 'a>>,
    transformer: Box<dyn ModelTransformer + 'a>,
    generator: Box<dyn CodeGenerator + 'a>,
}

impl<'a> PipelineOrchestrator<'a> {
    /// Orchestrator for `plan` with the reference transformer and generator and no converter.
    pub fn new(plan: PipelinePlan) -> Self {
        Self {
            plan,
            converter: None,
            transformer: Box::new(ReferenceTransformer::new()),
            generator: Box::new(CppGenerator::new()),
        }
    }

    /// Use `converter` for archive conversion.
    pub fn with_converter(mut self, converter: impl ArchiveConverter + 'a) -> Self {
        self.converter = Some(Box::new(converter));
        self
    }

    /// Use `transformer` for XML → intermediate transformation.
    pub fn with_transformer(mut self, transformer: impl ModelTransformer + 'a) -> Self {
        self.transformer = Box::new(transformer);
        self
    }

    /// Use `generator` for C++ generation.
    pub fn with_generator(mut self, generator: impl CodeGenerator + 'a) -> Self {
        self.generator = Box::new(generator);
        self
    }

    /// The plan being executed.
    pub fn plan(&self) -> &PipelinePlan { &self.plan }

    /// Run every stage the plan calls for.
    ///
    /// The first failing stage aborts the run; later stages do not start.
    pub fn run(&self) -> Result<RunReport> {
        let mut report = RunReport::default();
        let mut cache = ResourceIdentityCache::new();
        let plan = &self.plan;
        let generate_all = plan.inputs().is_from_directory();

        let intermediate_roots = match plan.origin() {
            StageOrigin::FromArchive | StageOrigin::FromXmlModel => {
                let xml_files = if plan.origin() == StageOrigin::FromArchive {
                    report.converted = self.convert_archives()?;
                    if plan.command() == Command::GenerateUml {
                        return Ok(report);
                    }
                    report.converted.clone()
                } else {
                    plan.inputs().files().to_vec()
                };
                self.transform_models(&xml_files, generate_all, &mut cache, &mut report)?
            }
            StageOrigin::FromIntermediateModel => {
                println!(">>>>> Loading {} models", ModelFormat::Intermediate);
                let roots = load_all(IntermediateModelParser, plan.inputs().files(), &mut cache)?;
                let scope = GenerationScope::compute(&roots, generate_all, plan.package());
                check_output_names(&scope)?;
                report.in_scope = scope.keys();
                scope.resources().to_vec()
            }
        };

        if plan.command() == Command::GenerateCpp {
            report.generated = self.generate_cpp(&intermediate_roots)?;
        }

        report.loaded = cache.keys().to_vec();
        Ok(report)
    }

    /// Stage 1: convert every archive, stopping at the first failure.
    fn convert_archives(&self) -> Result<Vec<PathBuf>> {
        let converter = self.converter.as_deref().ok_or(PipelineError::MissingConverter)?;
        let uml_dir = self.plan.uml_dir().ok_or(PipelineError::MissingOutputDir("--uml-dir"))?;
        fs::create_dir_all(uml_dir)?;
        println!(">>>>> {} --> {}", ModelFormat::Archive, ModelFormat::Xml);
        println!("      Destination dir : {}", uml_dir.display());

        let mut converted = Vec::with_capacity(self.plan.inputs().len());
        for archive in self.plan.inputs().files() {
            println!("      Mdzip file      : {}", archive.display());
            let stem = path::file_stem_string(archive).unwrap_or_default();
            let destination = uml_dir.join(&stem);
            let exit_code = converter.convert(archive, &destination)?;
            println!("        Exit value : {exit_code}");
            if exit_code != 0 {
                return Err(PipelineError::ConversionFailed { archive: archive.clone(), exit_code });
            }
            println!("      UML generation ok for {}", archive.display());
            converted.push(destination.join(format!("{stem}.{}", ModelFormat::Xml.extension())));
        }
        println!(">>>>> {} --> {} finished", ModelFormat::Archive, ModelFormat::Xml);
        Ok(converted)
    }

    /// Stage 2: load XML models, transform the in-scope ones, write them when asked.
    ///
    /// # Returns
    /// The produced intermediate resources, in scope order
    fn transform_models(
        &self,
        xml_files: &[PathBuf],
        generate_all: bool,
        cache: &mut ResourceIdentityCache,
        report: &mut RunReport,
    ) -> Result<Vec<Rc<Resource>>> {
        let plan = &self.plan;
        println!(">>>>> Loading {} models", ModelFormat::Xml);
        let roots = load_all(XmlModelParser, xml_files, cache)?;
        let scope = GenerationScope::compute(&roots, generate_all, plan.package());
        check_output_names(&scope)?;
        report.in_scope = scope.keys();

        let (model_dir, write) = match plan.command() {
            Command::GenerateModane => {
                (plan.modane_dir().ok_or(PipelineError::MissingOutputDir("--modane-dir"))?, true)
            }
            _ => (
                plan.cpp_dir().ok_or(PipelineError::MissingOutputDir("--cpp-dir"))?,
                plan.flags().write_modane_files,
            ),
        };
        let options = TransformOptions { obfuscate: plan.flags().obfuscate };
        if write {
            fs::create_dir_all(model_dir)?;
        }

        let mut produced = Vec::with_capacity(scope.len());
        for xml in scope.resources() {
            let dependencies = cache.dependencies_of(xml);
            let model = self.transformer.transform(xml, &dependencies, options)?;
            let path = model_dir.join(&model.file_name);

            if write {
                fs::write(&path, model.text.as_bytes())?;
                report.written_models.push(path.clone());
            }

            let imports = model
                .imports
                .iter()
                .map(|stem| {
                    ResourceKey::produced(
                        model_dir.join(format!("{stem}.{}", ModelFormat::Intermediate.extension())),
                    )
                })
                .collect();
            let key = ResourceKey::produced(path);
            let resource = match cache.get(&key) {
                Some(resident) => resident,
                None => {
                    let resource = Rc::new(
                        Resource::new(key, ModelFormat::Intermediate, model.text)
                            .with_package(Some(model.package))
                            .with_imports(imports),
                    );
                    cache.insert(Rc::clone(&resource))?;
                    resource
                }
            };
            produced.push(resource);
        }
        Ok(produced)
    }

    /// Stage 3: generate C++ for the in-scope intermediate models.
    fn generate_cpp(&self, resources: &[Rc<Resource>]) -> Result<Vec<PathBuf>> {
        let cpp_dir = self.plan.cpp_dir().ok_or(PipelineError::MissingOutputDir("--cpp-dir"))?;
        if resources.is_empty() {
            match self.plan.package() {
                Some(package) => println!(">>>>> No model in package {package}"),
                None => println!(">>>>> No model to generate"),
            }
            return Ok(Vec::new());
        }
        fs::create_dir_all(cpp_dir)?;

        println!(">>>>> Starting generation process");
        let request = GenerationRequest {
            resources,
            package: self.plan.package(),
            flags: self.plan.flags().codegen(),
        };
        let files = self.generator.generate(&request)?;
        let written = write_generated(cpp_dir, &files)?;
        println!(">>>>> Generation process ended successfully");
        Ok(written)
    }
}

/// Fail when two in-scope resources would be written under the same file stem.
fn check_output_names(scope: &GenerationScope) -> Result<()> {
    match scope.stem_collision() {
        Some((first, second)) => Err(PipelineError::OutputNameCollision {
            stem: first.stem(),
            first: first.path().to_path_buf(),
            second: second.path().to_path_buf(),
        }),
        None => Ok(()),
    }
}

/// Load every root through `cache`, announcing each one.
fn load_all<P: ResourceParser>(
    parser: P,
    files: &[PathBuf],
    cache: &mut ResourceIdentityCache,
) -> Result<Vec<Rc<Resource>>> {
    let loader = ResourceLoader::new(parser);
    let format = loader.parser().format();
    let mut roots = Vec::with_capacity(files.len());
    for file in files {
        println!(">>>>> Loading {} resource: {}", format, file.display());
        roots.push(loader.load(file, cache)?);
    }
    println!(">>>>> {} models loaded", format);
    Ok(roots)
}
